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

use crate::diagnostics::SearchLog;
use crate::discovery::JavaLocator;
use crate::discovery::probe::Probe;
use crate::models::install::JavaInstall;
use crate::paths::shared::child_directories;
use std::path::{Path, PathBuf};

/// Runtimes previously extracted into the managed JDK cache. Never touches
/// the network.
pub struct ProvisionedLocator {
    probe: Probe,
    cache_dir: PathBuf,
    log: SearchLog,
}

impl ProvisionedLocator {
    pub fn new(probe: Probe, cache_dir: &Path) -> Self {
        Self {
            probe,
            cache_dir: cache_dir.to_path_buf(),
            log: SearchLog::new(),
        }
    }

    fn search(&mut self, version: Option<u32>, first_only: bool) -> Vec<JavaInstall> {
        let mut found = Vec::new();
        if !self.cache_dir.is_dir() {
            self.log
                .push("Java Provisioner has not provisioned any Java installations");
            return found;
        }

        for dir in child_directories(&self.cache_dir) {
            let dir = std::path::absolute(&dir).unwrap_or(dir);
            self.log.push(format!("Disco Cache: \"{}\"", dir.display()));

            if let Some(install) = self.probe.probe(&dir, version, &mut self.log) {
                found.push(install);
                if first_only {
                    return found;
                }
            }
        }

        if found.is_empty() {
            self.log
                .push("Failed to find any Java installations from Disco cache");
        }
        found
    }
}

impl JavaLocator for ProvisionedLocator {
    fn name(&self) -> &'static str {
        "provisioned"
    }

    fn find(&mut self, version: Option<u32>) -> Option<JavaInstall> {
        self.search(version, true).into_iter().next()
    }

    fn find_all(&mut self, version: Option<u32>) -> Vec<JavaInstall> {
        self.search(version, false)
    }

    fn log(&self) -> &[String] {
        self.log.lines()
    }
}
