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

//! Out-of-process inspection of a candidate runtime.
//!
//! The candidate's `java` is run with `-XshowSettings:properties -version`,
//! which prints every system property as `key = value` on stderr. Nothing
//! a probe encounters is fatal: failures become lines in the caller's
//! [`SearchLog`] and the candidate is skipped.

use crate::diagnostics::SearchLog;
use crate::models::install::JavaInstall;
use crate::platform::HostFacts;
use crate::version::parse_specification_version;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::process::Command;

const SPEC_VERSION: &str = "java.specification.version";
const VERSION: &str = "java.version";
const VENDOR: &str = "java.vendor";

#[derive(Debug, Clone, Copy)]
pub struct Probe {
    host: HostFacts,
}

impl Probe {
    pub fn new(host: HostFacts) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &HostFacts {
        &self.host
    }

    /// Whether `home` contains this platform's `java` launcher.
    pub fn has_executable(&self, home: &Path) -> bool {
        self.host.java_in(home).is_file()
    }

    /// Probe `home`, rejecting it when `version` is given and differs from
    /// the runtime's major version.
    pub fn probe(&self, home: &Path, version: Option<u32>, log: &mut SearchLog) -> Option<JavaInstall> {
        let install = self.probe_home(home, log)?;
        match version {
            Some(wanted) if install.major_version != wanted => {
                log.push(format!(
                    "  Wrong version: Was {} wanted {wanted}",
                    install.major_version
                ));
                None
            }
            _ => Some(install),
        }
    }

    /// Probe the directory named by environment variable `name`.
    pub fn from_env(&self, name: &str, version: Option<u32>, log: &mut SearchLog) -> Option<JavaInstall> {
        let value = match env::var(name) {
            Ok(value) if !value.is_empty() => value,
            _ => {
                log.push(format!("Environment: \"{name}\" Empty"));
                return None;
            }
        };

        log.push(format!("Environment: \"{name}\""));
        log.push(format!("  Value: \"{value}\""));
        self.probe(Path::new(&value), version, log)
    }

    /// Probe `home` without a version requirement.
    pub fn probe_home(&self, home: &Path, log: &mut SearchLog) -> Option<JavaInstall> {
        let exe = self.host.java_in(home);
        if !exe.is_file() {
            log.push(format!("  Missing Executable: {}", exe.display()));
            return None;
        }

        let output = match Command::new(&exe)
            .args(["-XshowSettings:properties", "-version"])
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                log.push(format!("  Probe failed to start: {e}"));
                return None;
            }
        };

        let mut text = String::from_utf8_lossy(&output.stderr).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stdout));

        if !output.status.success() {
            match output.status.code() {
                Some(code) => log.push(format!("  Probe failed with exit code: {code}")),
                None => log.push("  Probe terminated by signal"),
            }
            for line in text.lines() {
                log.push(format!("    {line}"));
            }
            return None;
        }

        let properties = parse_properties(&text);
        let Some(major_version) = properties
            .get(SPEC_VERSION)
            .and_then(|value| parse_specification_version(value))
        else {
            log.push(format!("  Probe output is missing {SPEC_VERSION}"));
            return None;
        };

        Some(JavaInstall {
            home: home.to_path_buf(),
            is_jdk: home.join(self.host.javac_executable()).is_file(),
            major_version,
            version: properties.get(VERSION).cloned(),
            vendor: properties.get(VENDOR).cloned(),
        })
    }
}

/// Collect `key = value` lines. Continuation lines of multi-valued
/// properties carry no ` = ` and are skipped.
pub fn parse_properties(output: &str) -> HashMap<String, String> {
    output
        .lines()
        .filter_map(|line| line.trim().split_once(" = "))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .collect()
}
