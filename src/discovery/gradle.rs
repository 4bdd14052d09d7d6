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

//! Runtimes known to Gradle's toolchain support.
//!
//! Sources, in order:
//! * `org.gradle.java.installations.fromEnv`: environment variable names
//! * `org.gradle.java.installations.paths`: directories
//! * `JDK<digits>` environment variables (Gradle test distribution agents)
//! * JDKs Gradle auto-provisioned under `<gradle user home>/jdks`

use crate::config::ProvisionerConfig;
use crate::diagnostics::SearchLog;
use crate::discovery::JavaLocator;
use crate::discovery::probe::Probe;
use crate::models::install::JavaInstall;
use crate::models::platform::OperatingSystem;
use crate::paths::shared::child_directories;
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const FROM_ENV_PROPERTY: &str = "org.gradle.java.installations.fromEnv";
const PATHS_PROPERTY: &str = "org.gradle.java.installations.paths";
const MARKER_FILE: &str = ".ready";
const LEGACY_MARKER_FILE: &str = "provisioned.ok";
const MAC_HOME_DIR: &str = "Contents/Home";

static JDK_ENV_KEY: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new("^JDK[0-9]+$").ok());

/// Gradle properties and user home, normally taken from [`ProvisionerConfig`].
#[derive(Debug, Clone, Default)]
pub struct GradleSettings {
    pub installations_from_env: Option<String>,
    pub installations_paths: Option<String>,
    pub user_home: Option<PathBuf>,
}

impl GradleSettings {
    pub fn from_config(config: &ProvisionerConfig) -> Self {
        Self {
            installations_from_env: config.gradle_installations_from_env(),
            installations_paths: config.gradle_installations_paths(),
            user_home: config.gradle.user_home.clone(),
        }
    }
}

pub struct GradleLocator {
    probe: Probe,
    settings: GradleSettings,
    log: SearchLog,
}

impl GradleLocator {
    pub fn new(probe: Probe, settings: GradleSettings) -> Self {
        Self {
            probe,
            settings,
            log: SearchLog::new(),
        }
    }

    /// Run every source in order. With `first_only` the search stops at the
    /// first match.
    fn search(&mut self, version: Option<u32>, first_only: bool) -> Vec<JavaInstall> {
        let mut found = Vec::new();

        let from_env = self.settings.installations_from_env.clone();
        self.from_property(FROM_ENV_PROPERTY, from_env, version, first_only, &mut found);
        if first_only && !found.is_empty() {
            return found;
        }

        let paths = self.settings.installations_paths.clone();
        self.from_property(PATHS_PROPERTY, paths, version, first_only, &mut found);
        if first_only && !found.is_empty() {
            return found;
        }

        for key in jdk_env_keys() {
            if let Some(install) = self.probe.from_env(&key, version, &mut self.log) {
                found.push(install);
                if first_only {
                    return found;
                }
            }
        }

        self.from_gradle_home(version, first_only, &mut found);
        found
    }

    fn from_property(
        &mut self,
        name: &str,
        value: Option<String>,
        version: Option<u32>,
        first_only: bool,
        found: &mut Vec<JavaInstall>,
    ) {
        let Some(value) = value else {
            self.log.push(format!("Property: {name} = null"));
            self.log
                .push(format!("Could not find {name} in system properties"));
            return;
        };
        self.log.push(format!("Property: {name} = {value}"));

        let before = found.len();
        for item in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let install = if name == FROM_ENV_PROPERTY {
                self.probe.from_env(item, version, &mut self.log)
            } else {
                self.probe.probe(Path::new(item), version, &mut self.log)
            };
            if let Some(install) = install {
                found.push(install);
                if first_only {
                    return;
                }
            }
        }

        if found.len() == before {
            self.log
                .push(format!("Could not find any of {value} in {name}"));
        }
    }

    fn gradle_home(&self) -> PathBuf {
        let home = self
            .settings
            .user_home
            .clone()
            .or_else(|| env::var_os("GRADLE_USER_HOME").map(PathBuf::from))
            .or_else(|| dirs::home_dir().map(|home| home.join(".gradle")))
            .unwrap_or_else(|| PathBuf::from(".gradle"));

        fs::canonicalize(&home)
            .or_else(|_| std::path::absolute(&home))
            .unwrap_or(home)
    }

    fn from_gradle_home(&mut self, version: Option<u32>, first_only: bool, found: &mut Vec<JavaInstall>) {
        let gradle_home = self.gradle_home();
        if !gradle_home.is_dir() {
            self.log.push(format!(
                "Gradle home: \"{}\" Does not exist",
                gradle_home.display()
            ));
            return;
        }

        let jdks = gradle_home.join("jdks");
        if !jdks.is_dir() {
            self.log.push(format!(
                "Gradle Home JDKs: \"{}\" Does not exist",
                jdks.display()
            ));
            return;
        }

        let before = found.len();
        for dir in child_directories(&jdks) {
            for marked in find_markers(&dir) {
                let home = if self.probe.host().os == OperatingSystem::MacOs {
                    find_mac_home(&marked)
                } else {
                    marked
                };

                self.log
                    .push(format!("Gradle Home JDK: \"{}\"", home.display()));
                if let Some(install) = self.probe.probe(&home, version, &mut self.log) {
                    found.push(install);
                    if first_only {
                        return;
                    }
                }
            }
        }

        if found.len() == before {
            self.log.push(format!(
                "Could not find any Java installations in {}",
                jdks.display()
            ));
        }
    }
}

impl JavaLocator for GradleLocator {
    fn name(&self) -> &'static str {
        "gradle"
    }

    fn find(&mut self, version: Option<u32>) -> Option<JavaInstall> {
        let found = self.search(version, true).into_iter().next();
        if found.is_none() {
            self.log
                .push("Failed to find any Java installations from Gradle paths and properties");
        }
        found
    }

    fn find_all(&mut self, version: Option<u32>) -> Vec<JavaInstall> {
        let found = self.search(version, false);
        if found.is_empty() {
            self.log
                .push("Failed to find any Java installations from Gradle paths and properties");
        }
        found
    }

    fn log(&self) -> &[String] {
        self.log.lines()
    }
}

/// Environment variables named `JDK` followed by one or more digits, sorted.
fn jdk_env_keys() -> Vec<String> {
    let mut keys: Vec<String> = env::vars_os()
        .filter_map(|(key, _)| key.into_string().ok())
        .filter(|key| is_jdk_env_key(key))
        .collect();
    keys.sort();
    keys
}

fn is_jdk_env_key(key: &str) -> bool {
    JDK_ENV_KEY
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(key))
}

fn is_marked(dir: &Path) -> bool {
    dir.join(MARKER_FILE).exists() || dir.join(LEGACY_MARKER_FILE).exists()
}

/// `root` and its immediate subdirectories that carry a completion marker.
/// Gradle before 8.8 did not strip the archive's root folder, so the marker
/// may sit one level down.
fn find_markers(root: &Path) -> Vec<PathBuf> {
    let mut marked = Vec::new();
    if is_marked(root) {
        marked.push(root.to_path_buf());
    }
    marked.extend(child_directories(root).into_iter().filter(|child| is_marked(child)));
    marked
}

/// macOS bundles keep the runtime under `Contents/Home`.
fn find_mac_home(root: &Path) -> PathBuf {
    let direct = root.join(MAC_HOME_DIR);
    if direct.exists() {
        return direct;
    }

    child_directories(root)
        .into_iter()
        .map(|child| child.join(MAC_HOME_DIR))
        .find(|home| home.exists())
        .unwrap_or_else(|| root.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::package::LibC;
    use crate::models::platform::Architecture;
    use crate::platform::HostFacts;
    use crate::test::fixtures::{linux_host, touch};
    use tempfile::TempDir;

    fn locator_for(user_home: &Path) -> GradleLocator {
        GradleLocator::new(
            Probe::new(linux_host()),
            GradleSettings {
                user_home: Some(user_home.to_path_buf()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_jdk_env_key_pattern() {
        assert!(is_jdk_env_key("JDK8"));
        assert!(is_jdk_env_key("JDK17"));
        assert!(!is_jdk_env_key("JDK"));
        assert!(!is_jdk_env_key("JDK_17"));
        assert!(!is_jdk_env_key("JDK17_HOME"));
        assert!(!is_jdk_env_key("MY_JDK17"));
        assert!(!is_jdk_env_key("JDK\u{0661}\u{0667}"));
    }

    #[test]
    fn test_find_markers_accepts_root_and_children() {
        let temp = TempDir::new().unwrap();
        let current = temp.path().join("eclipse_adoptium-17-amd64-linux");
        let legacy = temp.path().join("azul_zulu-11-amd64-linux");
        touch(&current.join(MARKER_FILE));
        touch(&legacy.join("zulu11.64.19-ca-jdk11.0.19-linux_x64").join(LEGACY_MARKER_FILE));
        fs::create_dir_all(temp.path().join("unmarked").join("bin")).unwrap();

        assert_eq!(find_markers(&current), vec![current.clone()]);
        assert_eq!(
            find_markers(&legacy),
            vec![legacy.join("zulu11.64.19-ca-jdk11.0.19-linux_x64")]
        );
        assert!(find_markers(&temp.path().join("unmarked")).is_empty());
    }

    #[test]
    fn test_find_mac_home() {
        let temp = TempDir::new().unwrap();
        let direct = temp.path().join("direct");
        fs::create_dir_all(direct.join(MAC_HOME_DIR)).unwrap();
        let nested = temp.path().join("nested");
        fs::create_dir_all(nested.join("jdk-17.0.9+9").join(MAC_HOME_DIR)).unwrap();
        let plain = temp.path().join("plain");
        fs::create_dir_all(&plain).unwrap();

        assert_eq!(find_mac_home(&direct), direct.join(MAC_HOME_DIR));
        assert_eq!(
            find_mac_home(&nested),
            nested.join("jdk-17.0.9+9").join(MAC_HOME_DIR)
        );
        assert_eq!(find_mac_home(&plain), plain);
    }

    #[test]
    fn test_missing_gradle_home_is_logged() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("no-gradle");
        let mut locator = locator_for(&missing);

        let mut found = Vec::new();
        locator.from_gradle_home(Some(17), false, &mut found);

        assert!(found.is_empty());
        assert_eq!(
            locator.log(),
            [format!("Gradle home: \"{}\" Does not exist", missing.display())]
        );
    }

    #[test]
    fn test_unset_properties_are_logged() {
        let mut locator = locator_for(Path::new("/nonexistent"));
        let mut found = Vec::new();
        locator.from_property(FROM_ENV_PROPERTY, None, None, false, &mut found);

        assert_eq!(
            locator.log(),
            [
                "Property: org.gradle.java.installations.fromEnv = null",
                "Could not find org.gradle.java.installations.fromEnv in system properties",
            ]
        );
    }

    #[test]
    fn test_unmatched_paths_are_logged() {
        let temp = TempDir::new().unwrap();
        let mut locator = locator_for(temp.path());
        let mut found = Vec::new();
        let value = format!("{},{}", temp.path().join("a").display(), temp.path().join("b").display());
        locator.from_property(PATHS_PROPERTY, Some(value.clone()), None, false, &mut found);

        assert!(found.is_empty());
        assert_eq!(
            locator.log().last().unwrap(),
            &format!("Could not find any of {value} in {PATHS_PROPERTY}")
        );
    }

    #[test]
    fn test_mac_host_probes_bundle_home() {
        let temp = TempDir::new().unwrap();
        let gradle_home = fs::canonicalize(temp.path()).unwrap();
        let marked = gradle_home.join("jdks").join("temurin-17-aarch64-mac");
        touch(&marked.join(MARKER_FILE));
        fs::create_dir_all(marked.join(MAC_HOME_DIR)).unwrap();

        let host = HostFacts::new(OperatingSystem::MacOs, Architecture::Aarch64, LibC::Glibc);
        let mut locator = GradleLocator::new(
            Probe::new(host),
            GradleSettings {
                user_home: Some(gradle_home.clone()),
                ..Default::default()
            },
        );
        let mut found = Vec::new();
        locator.from_gradle_home(None, false, &mut found);

        assert!(found.is_empty());
        let log = locator.log();
        assert_eq!(
            log[0],
            format!("Gradle Home JDK: \"{}\"", marked.join(MAC_HOME_DIR).display())
        );
        assert!(log[1].starts_with("  Missing Executable: "));
        assert!(log.last().unwrap().starts_with("Could not find any Java installations in "));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use crate::test::fixtures::{local_host, write_fake_jdk};
        use serial_test::serial;

        #[test]
        #[serial]
        fn test_gradle_provisioned_jdks() {
            let temp = TempDir::new().unwrap();
            let gradle_home = fs::canonicalize(temp.path()).unwrap();
            let jdks = gradle_home.join("jdks");

            let jdk17 = jdks.join("eclipse_adoptium-17-amd64-linux");
            write_fake_jdk(&jdk17, "17", "17.0.9", "Eclipse Adoptium");
            touch(&jdk17.join(MARKER_FILE));

            let jdk21 = jdks.join("azul_zulu-21-amd64-linux").join("zulu21.30.15-ca-jdk21.0.1-linux_x64");
            write_fake_jdk(&jdk21, "21", "21.0.1", "Azul Systems, Inc.");
            touch(&jdk21.join(LEGACY_MARKER_FILE));

            // Not marked, never probed
            write_fake_jdk(&jdks.join("partial"), "11", "11.0.21", "Eclipse Adoptium");

            let mut locator = GradleLocator::new(
                Probe::new(local_host()),
                GradleSettings {
                    user_home: Some(gradle_home.clone()),
                    ..Default::default()
                },
            );

            let mut all = Vec::new();
            locator.from_gradle_home(None, false, &mut all);
            let homes: Vec<_> = all.iter().map(|install| install.home.clone()).collect();
            assert_eq!(homes, vec![jdk21.clone(), jdk17.clone()]);

            let mut first = Vec::new();
            locator.from_gradle_home(Some(17), true, &mut first);
            assert_eq!(first.len(), 1);
            assert_eq!(first[0].home, jdk17);
        }

        #[test]
        #[serial]
        fn test_paths_property_is_searched_before_gradle_home() {
            let temp = TempDir::new().unwrap();
            let listed = temp.path().join("listed-jdk");
            write_fake_jdk(&listed, "17", "17.0.2", "Oracle Corporation");

            let mut locator = GradleLocator::new(
                Probe::new(local_host()),
                GradleSettings {
                    installations_paths: Some(format!(" {} ", listed.display())),
                    user_home: Some(temp.path().join("missing-gradle-home")),
                    ..Default::default()
                },
            );

            let found = locator.find(Some(17)).unwrap();
            assert_eq!(found.home, listed);
            assert!(
                !locator
                    .log()
                    .iter()
                    .any(|line| line.starts_with("Gradle home:"))
            );
        }
    }
}
