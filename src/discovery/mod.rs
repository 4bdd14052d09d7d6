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

//! Discovery of Java runtimes already present on this machine.
//!
//! Each strategy implements [`JavaLocator`]. A strategy that finds nothing
//! returns `None` or an empty list and explains itself in its log; only
//! [`LocatorChain::find`] turns total absence into an error.

pub mod directory;
pub mod environment;
pub mod gradle;
pub mod probe;
pub mod provisioned;

pub use directory::DirectoryLocator;
pub use environment::EnvironmentLocator;
pub use gradle::{GradleLocator, GradleSettings};
pub use probe::Probe;
pub use provisioned::ProvisionedLocator;

use crate::config::ProvisionerConfig;
use crate::error::{ProvisionerError, Result};
use crate::models::install::{JavaInstall, sort_installs};
use crate::platform::HostFacts;
use log::{debug, info};
use std::collections::HashSet;
use std::fs;

pub trait JavaLocator {
    /// Short name used when reporting the search trail.
    fn name(&self) -> &'static str;

    /// First runtime matching `version` (`None` accepts any major version).
    fn find(&mut self, version: Option<u32>) -> Option<JavaInstall>;

    /// Every runtime matching `version`, in discovery order.
    fn find_all(&mut self, version: Option<u32>) -> Vec<JavaInstall>;

    /// Lines recorded by every search so far.
    fn log(&self) -> &[String];
}

/// Strategies tried in priority order.
pub struct LocatorChain {
    locators: Vec<Box<dyn JavaLocator>>,
}

impl LocatorChain {
    pub fn new(locators: Vec<Box<dyn JavaLocator>>) -> Self {
        Self { locators }
    }

    /// Environment variables, then Gradle, then well-known directories, then
    /// the provisioner's own cache.
    pub fn standard(host: HostFacts, config: &ProvisionerConfig) -> Self {
        let probe = Probe::new(host);
        Self::new(vec![
            Box::new(EnvironmentLocator::new(probe)),
            Box::new(GradleLocator::new(probe, GradleSettings::from_config(config))),
            Box::new(DirectoryLocator::with_guesses(probe)),
            Box::new(ProvisionedLocator::new(probe, &config.jdk_cache_dir())),
        ])
    }

    pub fn find(&mut self, version: Option<u32>) -> Result<JavaInstall> {
        for locator in &mut self.locators {
            if let Some(install) = locator.find(version) {
                info!("Found {install} via {}", locator.name());
                return Ok(install);
            }
            debug!("No match from {} locator", locator.name());
        }

        Err(ProvisionerError::NotFound {
            message: match version {
                Some(version) => format!("No Java {version} installation found"),
                None => "No Java installation found".to_string(),
            },
            log: self.log(),
        })
    }

    /// Union of every strategy's results, de-duplicated by home directory
    /// and sorted best first.
    pub fn find_all(&mut self, version: Option<u32>) -> Vec<JavaInstall> {
        let mut seen = HashSet::new();
        let mut installs = Vec::new();

        for locator in &mut self.locators {
            for install in locator.find_all(version) {
                let key = fs::canonicalize(&install.home).unwrap_or_else(|_| install.home.clone());
                if seen.insert(key) {
                    installs.push(install);
                }
            }
        }

        sort_installs(&mut installs);
        installs
    }

    /// Every strategy's trail, each introduced by a header line.
    pub fn log(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for locator in &self.locators {
            lines.push(format!("Locator: {}", locator.name()));
            lines.extend(locator.log().iter().map(|line| format!("  {line}")));
        }
        lines
    }
}
