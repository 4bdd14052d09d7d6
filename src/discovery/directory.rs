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
use crate::models::platform::OperatingSystem;
use crate::paths::shared::child_directories;
use crate::platform::HostFacts;
use std::env;
use std::path::{Path, PathBuf};

/// Searches well-known install roots and their immediate subdirectories.
pub struct DirectoryLocator {
    probe: Probe,
    homes: Vec<PathBuf>,
    log: SearchLog,
}

impl DirectoryLocator {
    /// Search the given roots. Each root counts as a runtime home itself if
    /// it holds the launcher, otherwise its subdirectories that do are used.
    pub fn new(probe: Probe, roots: &[PathBuf]) -> Self {
        let homes = expand(&probe, roots);
        Self {
            probe,
            homes,
            log: SearchLog::new(),
        }
    }

    /// Search the platform's conventional locations.
    pub fn with_guesses(probe: Probe) -> Self {
        let roots = guesses(probe.host());
        Self::new(probe, &roots)
    }

    pub fn homes(&self) -> &[PathBuf] {
        &self.homes
    }

    fn log_failure(&mut self) {
        let paths = self
            .homes
            .iter()
            .map(|home| home.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        self.log.push(format!(
            "Failed to find any Java installations from paths: {paths}"
        ));
    }
}

impl JavaLocator for DirectoryLocator {
    fn name(&self) -> &'static str {
        "directories"
    }

    fn find(&mut self, version: Option<u32>) -> Option<JavaInstall> {
        for home in &self.homes {
            if let Some(install) = self.probe.probe(home, version, &mut self.log) {
                return Some(install);
            }
        }
        self.log_failure();
        None
    }

    fn find_all(&mut self, version: Option<u32>) -> Vec<JavaInstall> {
        let found: Vec<JavaInstall> = self
            .homes
            .iter()
            .filter_map(|home| self.probe.probe(home, version, &mut self.log))
            .collect();
        if found.is_empty() {
            self.log_failure();
        }
        found
    }

    fn log(&self) -> &[String] {
        self.log.lines()
    }
}

fn expand(probe: &Probe, roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut homes = Vec::new();
    for root in roots {
        if probe.has_executable(root) {
            homes.push(root.clone());
        } else {
            homes.extend(
                child_directories(root)
                    .into_iter()
                    .filter(|child| probe.has_executable(child)),
            );
        }
    }
    homes
}

/// Conventional install roots for `host`, restricted to existing directories.
pub fn guesses(host: &HostFacts) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    let user_home = dirs::home_dir();

    match host.os {
        OperatingSystem::Windows => {
            for drive in windows_drive_roots() {
                roots.push(drive.join("Program Files").join("Java"));
                if host.is_64_bit() {
                    roots.push(drive.join("Program Files (x86)").join("Java"));
                }
            }
        }
        OperatingSystem::MacOs => roots.push(PathBuf::from("/Library/Java/JavaVirtualMachines")),
        _ => roots.extend(
            [
                "/usr/java",
                "/usr/lib/jvm",
                "/usr/lib64/jvm",
                "/usr/local",
                "/opt",
                "/app/jdk",
                "/opt/jdk",
                "/opt/jdks",
            ]
            .map(PathBuf::from),
        ),
    }

    if let Some(user_home) = &user_home {
        // IntelliJ
        if host.os == OperatingSystem::MacOs {
            roots.push(user_home.join("Library/Java/JavaVirtualMachines"));
        } else {
            roots.push(user_home.join(".jdks"));
        }
        // Jabba
        roots.push(user_home.join(".jabba/jdks"));
    }
    if let Some(jabba_home) = env::var_os("JABBA_HOME") {
        roots.push(Path::new(&jabba_home).join("jdks"));
    }
    if let Some(user_home) = &user_home {
        roots.push(user_home.join(".sdkman/candidates/java"));
        roots.push(user_home.join(".asdf/installs/java"));
    }
    if let Some(asdf_data) = env::var_os("ASDF_DATA_DIR") {
        roots.push(Path::new(&asdf_data).join("installs/java"));
    }

    roots.retain(|root| root.is_dir());
    roots
}

fn windows_drive_roots() -> Vec<PathBuf> {
    (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .filter(|root| root.is_dir())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::fixtures::{linux_host, touch};
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_expand_uses_root_or_children() {
        let temp = TempDir::new().unwrap();
        let direct = temp.path().join("jdk-direct");
        touch(&direct.join("bin/java"));

        let parent = temp.path().join("jvm");
        touch(&parent.join("java-17-openjdk/bin/java"));
        touch(&parent.join("java-21-openjdk/bin/java"));
        fs::create_dir_all(parent.join("empty")).unwrap();
        fs::write(parent.join("README"), b"").unwrap();

        let probe = Probe::new(linux_host());
        let homes = expand(&probe, &[direct.clone(), parent.clone(), temp.path().join("missing")]);

        assert_eq!(
            homes,
            vec![
                direct,
                parent.join("java-17-openjdk"),
                parent.join("java-21-openjdk"),
            ]
        );
    }

    #[test]
    #[serial]
    fn test_guesses_include_version_manager_overrides() {
        let temp = TempDir::new().unwrap();
        let jabba = temp.path().join("jabba");
        let asdf = temp.path().join("asdf");
        fs::create_dir_all(jabba.join("jdks")).unwrap();
        fs::create_dir_all(asdf.join("installs/java")).unwrap();

        unsafe {
            env::set_var("JABBA_HOME", &jabba);
            env::set_var("ASDF_DATA_DIR", &asdf);
        }
        let roots = guesses(&linux_host());
        unsafe {
            env::remove_var("JABBA_HOME");
            env::remove_var("ASDF_DATA_DIR");
        }

        assert!(roots.contains(&jabba.join("jdks")));
        assert!(roots.contains(&asdf.join("installs/java")));
        assert!(roots.iter().all(|root| root.is_dir()));
    }

    #[test]
    fn test_failure_lists_searched_homes() {
        let temp = TempDir::new().unwrap();
        let mut locator = DirectoryLocator::new(Probe::new(linux_host()), &[temp.path().to_path_buf()]);

        assert!(locator.homes().is_empty());
        assert!(locator.find(Some(17)).is_none());
        assert_eq!(
            locator.log(),
            ["Failed to find any Java installations from paths: "]
        );
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_find_all_probes_each_home() {
        use crate::test::fixtures::{local_host, write_fake_jdk};

        let temp = TempDir::new().unwrap();
        write_fake_jdk(&temp.path().join("jdk-17"), "17", "17.0.9", "Eclipse Adoptium");
        write_fake_jdk(&temp.path().join("jdk-21"), "21", "21.0.3", "Eclipse Adoptium");

        let mut locator = DirectoryLocator::new(Probe::new(local_host()), &[temp.path().to_path_buf()]);
        let all = locator.find_all(None);
        assert_eq!(all.len(), 2);

        let found = locator.find(Some(21)).unwrap();
        assert_eq!(found.home, temp.path().join("jdk-21"));
        assert!(
            locator
                .log()
                .contains(&"  Wrong version: Was 17 wanted 21".to_string())
        );
    }
}
