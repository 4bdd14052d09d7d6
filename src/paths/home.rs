// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::{ProvisionerError, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "JAVA_PROVISIONER_HOME";
pub const DEFAULT_HOME_DIR: &str = ".java-provisioner";
pub const JDKS_DIR: &str = "jdks";
pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the provisioner home: `JAVA_PROVISIONER_HOME` when set, else
/// `~/.java-provisioner`.
pub fn resolve_home() -> Result<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir()
        .map(|home| home.join(DEFAULT_HOME_DIR))
        .ok_or_else(|| {
            ProvisionerError::ConfigError(format!(
                "Unable to determine the home directory; set {HOME_ENV}"
            ))
        })
}

pub fn jdks_dir(home: &Path) -> PathBuf {
    home.join(JDKS_DIR)
}

pub fn config_file(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE)
}
