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
use std::env;

const JAVA_HOME: &str = "JAVA_HOME";

/// Finds runtimes named by `JAVA_HOME` style environment variables.
///
/// Variables are tried in order: `JAVA_HOME_<v><arch>` as set by CI images,
/// `JAVA_HOME_<v>`, plain `JAVA_HOME`, then every other variable starting
/// with `JAVA_HOME` in name order.
pub struct EnvironmentLocator {
    probe: Probe,
    log: SearchLog,
}

impl EnvironmentLocator {
    pub fn new(probe: Probe) -> Self {
        Self {
            probe,
            log: SearchLog::new(),
        }
    }

    fn keys(&self, version: Option<u32>) -> Vec<String> {
        let mut keys = Vec::new();
        let mut add = |key: String| {
            if !keys.contains(&key) {
                keys.push(key);
            }
        };

        if let Some(version) = version {
            let suffix = self.probe.host().arch.env_suffix();
            add(format!("{JAVA_HOME}_{version}{suffix}"));
            add(format!("{JAVA_HOME}_{version}"));
        }
        add(JAVA_HOME.to_string());

        let mut others: Vec<String> = env::vars_os()
            .filter_map(|(key, _)| key.into_string().ok())
            .filter(|key| key.starts_with(JAVA_HOME))
            .collect();
        others.sort();
        for key in others {
            add(key);
        }

        keys
    }
}

impl JavaLocator for EnvironmentLocator {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn find(&mut self, version: Option<u32>) -> Option<JavaInstall> {
        for key in self.keys(version) {
            if let Some(install) = self.probe.from_env(&key, version, &mut self.log) {
                return Some(install);
            }
        }
        self.log
            .push("Failed to find any Java installations from JAVA_HOME environment variables");
        None
    }

    fn find_all(&mut self, version: Option<u32>) -> Vec<JavaInstall> {
        let found: Vec<JavaInstall> = self
            .keys(version)
            .iter()
            .filter_map(|key| self.probe.from_env(key, version, &mut self.log))
            .collect();
        if found.is_empty() {
            self.log
                .push("Failed to find any Java installations from JAVA_HOME environment variables");
        }
        found
    }

    fn log(&self) -> &[String] {
        self.log.lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::package::LibC;
    use crate::models::platform::{Architecture, OperatingSystem};
    use crate::platform::HostFacts;
    use serial_test::serial;

    fn clear_java_home_vars() {
        let keys: Vec<_> = env::vars_os()
            .filter_map(|(key, _)| key.into_string().ok())
            .filter(|key| key.starts_with(JAVA_HOME))
            .collect();
        for key in keys {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    fn locator(arch: Architecture) -> EnvironmentLocator {
        EnvironmentLocator::new(Probe::new(HostFacts::new(
            OperatingSystem::Linux,
            arch,
            LibC::Glibc,
        )))
    }

    #[test]
    #[serial]
    fn test_key_order_for_versioned_request() {
        clear_java_home_vars();
        unsafe {
            env::set_var("JAVA_HOME_8_X64", "/opt/jdk8");
            env::set_var("JAVA_HOME_21_X64", "/opt/jdk21");
        }
        let keys = locator(Architecture::X64).keys(Some(17));
        clear_java_home_vars();

        assert_eq!(
            keys,
            vec![
                "JAVA_HOME_17_X64",
                "JAVA_HOME_17",
                "JAVA_HOME",
                "JAVA_HOME_21_X64",
                "JAVA_HOME_8_X64",
            ]
        );
    }

    #[test]
    #[serial]
    fn test_key_order_deduplicates_and_uses_arch_suffix() {
        clear_java_home_vars();
        unsafe {
            env::set_var("JAVA_HOME", "/opt/jdk");
            env::set_var("JAVA_HOME_17_arm64", "/opt/jdk17");
        }
        let arm = locator(Architecture::Aarch64).keys(Some(17));
        let x86 = locator(Architecture::X86).keys(Some(17));
        let wildcard = locator(Architecture::X64).keys(None);
        clear_java_home_vars();

        assert_eq!(arm, vec!["JAVA_HOME_17_arm64", "JAVA_HOME_17", "JAVA_HOME"]);
        assert_eq!(
            x86,
            vec!["JAVA_HOME_17", "JAVA_HOME", "JAVA_HOME_17_arm64"]
        );
        assert_eq!(wildcard, vec!["JAVA_HOME", "JAVA_HOME_17_arm64"]);
    }

    #[test]
    #[serial]
    fn test_nothing_found_is_logged_not_fatal() {
        clear_java_home_vars();
        let mut locator = locator(Architecture::X64);
        assert!(locator.find(Some(17)).is_none());
        assert!(locator.find_all(Some(17)).is_empty());
        assert_eq!(locator.log()[0], "Environment: \"JAVA_HOME_17_X64\" Empty");
        assert_eq!(
            locator.log().last().unwrap(),
            "Failed to find any Java installations from JAVA_HOME environment variables"
        );
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_ci_variable_is_found_first() {
        use crate::test::fixtures::{local_host, write_fake_jdk};
        use tempfile::TempDir;

        clear_java_home_vars();
        let jdk17 = TempDir::new().unwrap();
        let jdk21 = TempDir::new().unwrap();
        write_fake_jdk(jdk17.path(), "17", "17.0.9", "Eclipse Adoptium");
        write_fake_jdk(jdk21.path(), "21", "21.0.3", "Eclipse Adoptium");

        let host = local_host();
        let suffix = host.arch.env_suffix();
        unsafe {
            env::set_var(format!("JAVA_HOME_17{suffix}"), jdk17.path());
            env::set_var("JAVA_HOME", jdk21.path());
        }

        let mut locator = EnvironmentLocator::new(Probe::new(host));
        let found = locator.find(Some(17));
        let all = locator.find_all(None);
        clear_java_home_vars();

        assert_eq!(found.unwrap().home, jdk17.path());
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].home, jdk21.path());
    }
}
