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

//! File names inside the managed JDK cache directory.
//!
//! The catalog snapshot, per-package detail records, downloaded archives and
//! their extracted runtimes all live side by side in one directory.

use crate::error::{ProvisionerError, Result};
use crate::models::descriptor::extracted_dir_name;
use std::path::{Component, Path, PathBuf};

pub const PACKAGES_FILE: &str = "packages.json";

pub fn packages_file(cache: &Path) -> PathBuf {
    cache.join(PACKAGES_FILE)
}

pub fn detail_file(cache: &Path, filename: &str) -> Result<PathBuf> {
    cache_entry(cache, filename).map(|_| cache.join(format!("{filename}.json")))
}

pub fn archive_file(cache: &Path, filename: &str) -> Result<PathBuf> {
    cache_entry(cache, filename)
}

pub fn extracted_dir(cache: &Path, filename: &str) -> Result<PathBuf> {
    cache_entry(cache, filename)?;
    cache_entry(cache, extracted_dir_name(filename))
}

/// `cache/name`, provided `name` is a single plain file name. Catalog file
/// names come from the server and must not climb out of the cache.
fn cache_entry(cache: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(cache.join(part)),
        _ => Err(ProvisionerError::UnsafeFileName(name.to_string())),
    }
}
