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

//! Host platform facts.
//!
//! The current architecture, operating system and libc are detected once at
//! startup into a [`HostFacts`] value that is passed explicitly to every
//! component, so tests can substitute synthetic hosts.

pub mod detection;
pub mod file_ops;

pub use detection::{CommandOutput, detect_architecture, detect_libc, detect_os, run_command};

use crate::models::package::LibC;
use crate::models::platform::{Architecture, OperatingSystem};
use log::debug;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostFacts {
    pub os: OperatingSystem,
    pub arch: Architecture,
    pub libc: LibC,
}

impl HostFacts {
    pub fn new(os: OperatingSystem, arch: Architecture, libc: LibC) -> Self {
        Self { os, arch, libc }
    }

    /// Inspect the running system. On Linux this may spawn `getconf` and `ldd`.
    pub fn detect() -> Self {
        let os = detect_os();
        let arch = detect_architecture();
        let libc = detect_libc(os, run_command);
        debug!("Host platform: os={os} arch={arch} libc={libc}");
        Self { os, arch, libc }
    }

    pub fn is_musl(&self) -> bool {
        self.libc == LibC::Musl
    }

    /// Path of the `java` launcher relative to a runtime home.
    pub fn java_executable(&self) -> String {
        format!("bin/java{}", self.os.executable_extension())
    }

    pub fn javac_executable(&self) -> String {
        format!("bin/javac{}", self.os.executable_extension())
    }

    pub fn java_in(&self, home: &Path) -> PathBuf {
        home.join(self.java_executable())
    }

    pub fn is_64_bit(&self) -> bool {
        self.arch.is_64_bit()
    }
}

impl Default for HostFacts {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executable_paths() {
        let linux = HostFacts::new(OperatingSystem::Linux, Architecture::X64, LibC::Glibc);
        assert_eq!(linux.java_executable(), "bin/java");
        assert_eq!(
            linux.java_in(Path::new("/opt/jdk")),
            PathBuf::from("/opt/jdk/bin/java")
        );

        let windows = HostFacts::new(OperatingSystem::Windows, Architecture::X64, LibC::CStdLib);
        assert_eq!(windows.java_executable(), "bin/java.exe");
        assert_eq!(windows.javac_executable(), "bin/javac.exe");
    }

    #[test]
    fn test_detect_is_consistent() {
        let facts = HostFacts::detect();
        assert_eq!(facts.os, detect_os());
        assert_eq!(facts.arch, detect_architecture());
    }
}
