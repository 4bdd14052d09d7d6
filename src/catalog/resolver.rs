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

use crate::models::descriptor::PackageDescriptor;
use crate::models::distribution::Distribution;
use crate::models::package::LibC;
use crate::models::platform::{Architecture, OperatingSystem};
use std::fmt;

/// Which catalog entries are acceptable. `None` fields match anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackageRequest {
    /// Major JDK version; `None` selects the newest version available.
    pub version: Option<u32>,
    pub os: Option<OperatingSystem>,
    pub arch: Option<Architecture>,
    pub distro: Option<Distribution>,
}

impl PackageRequest {
    pub fn new(version: Option<u32>) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    pub fn with_os(mut self, os: Option<OperatingSystem>) -> Self {
        self.os = os;
        self
    }

    pub fn with_arch(mut self, arch: Option<Architecture>) -> Self {
        self.arch = arch;
        self
    }

    pub fn with_distro(mut self, distro: Option<Distribution>) -> Self {
        self.distro = distro;
        self
    }

    fn matches(&self, package: &PackageDescriptor, host_libc: LibC) -> bool {
        if self.version.is_some_and(|v| package.jdk_version() != v) {
            return false;
        }
        if self.os.is_some_and(|os| package.os() != Some(os)) {
            return false;
        }
        if self.distro.is_some_and(|distro| package.distro() != Some(distro)) {
            return false;
        }
        if let Some(arch) = self.arch {
            match package.arch() {
                Some(package_arch) if arch.accepts(package_arch) => {}
                _ => return false,
            }
        }
        // Musl builds only run on musl hosts. Host musl detection is a
        // heuristic, see platform::detect_libc.
        !(host_libc != LibC::Musl && package.libc() == Some(LibC::Musl))
    }
}

/// Renders as `[distro ]<version> - <os> <arch>`, with `ANY` for wildcards.
impl fmt::Display for PackageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(distro) = self.distro {
            write!(f, "{distro} ")?;
        }
        match self.version {
            Some(version) => write!(f, "{version}")?,
            None => write!(f, "latest")?,
        }
        match self.os {
            Some(os) => write!(f, " - {os}")?,
            None => write!(f, " - ANY")?,
        }
        match self.arch {
            Some(arch) => write!(f, " {arch}"),
            None => write!(f, " ANY"),
        }
    }
}

/// Filter `packages` by `request` and rank the result best first.
///
/// For a wildcard version the other filters run first, and only entries at
/// the highest JDK version left are kept, across all distributions.
pub fn resolve(
    packages: &[PackageDescriptor],
    request: &PackageRequest,
    host_libc: LibC,
) -> Vec<PackageDescriptor> {
    let mut matched: Vec<PackageDescriptor> = packages
        .iter()
        .filter(|package| request.matches(package, host_libc))
        .cloned()
        .collect();

    if request.version.is_none() {
        if let Some(max) = matched.iter().map(|package| package.jdk_version()).max() {
            matched.retain(|package| package.jdk_version() == max);
        }
    }

    matched.sort_by(|a, b| a.catalog_order(b));
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::fixtures::{package, package_for};

    fn ids(packages: &[PackageDescriptor]) -> Vec<&str> {
        packages.iter().map(|package| package.id()).collect()
    }

    fn linux_x64(version: Option<u32>) -> PackageRequest {
        PackageRequest::new(version)
            .with_os(Some(OperatingSystem::Linux))
            .with_arch(Some(Architecture::X64))
    }

    #[test]
    fn test_wildcard_keeps_only_newest_version() {
        let catalog = vec![package("a", 21, "temurin"), package("b", 22, "temurin")];
        let request = linux_x64(None).with_distro(Some(Distribution::Temurin));

        assert_eq!(ids(&resolve(&catalog, &request, LibC::Glibc)), vec!["b"]);
    }

    #[test]
    fn test_wildcard_maximum_is_global_across_distributions() {
        let catalog = vec![
            package("zulu-23", 23, "zulu"),
            package("temurin-22", 22, "temurin"),
            package("temurin-21", 21, "temurin"),
            package_for("arm-24", 24, "temurin", "linux", "aarch64", "glibc"),
        ];

        let resolved = resolve(&catalog, &linux_x64(None), LibC::Glibc);
        assert_eq!(ids(&resolved), vec!["zulu-23"]);
    }

    #[test]
    fn test_exact_version_and_ranking() {
        let catalog = vec![
            package("zulu-17", 17, "zulu"),
            package("corretto-17", 17, "corretto"),
            package("temurin-17", 17, "temurin"),
            package("temurin-21", 21, "temurin"),
            package("ms-17", 17, "microsoft"),
        ];

        let resolved = resolve(&catalog, &linux_x64(Some(17)), LibC::Glibc);
        assert_eq!(
            ids(&resolved),
            vec!["ms-17", "temurin-17", "zulu-17", "corretto-17"]
        );
    }

    #[test]
    fn test_musl_packages_need_musl_host() {
        let catalog = vec![
            package_for("musl", 21, "temurin", "linux", "x64", "musl"),
            package_for("glibc", 21, "temurin", "linux", "x64", "glibc"),
        ];
        let request = linux_x64(Some(21));

        assert_eq!(ids(&resolve(&catalog, &request, LibC::Glibc)), vec!["glibc"]);
        assert_eq!(
            ids(&resolve(&catalog, &request, LibC::Musl)),
            vec!["glibc", "musl"]
        );
    }

    #[test]
    fn test_arch_accepts_parent() {
        let catalog = vec![
            package_for("x64", 21, "temurin", "linux", "x64", "glibc"),
            package_for("amd64", 21, "zulu", "linux", "amd64", "glibc"),
            package_for("arm", 21, "temurin", "linux", "aarch64", "glibc"),
            package_for("none", 21, "corretto", "linux", "", "glibc"),
        ];

        let request = PackageRequest::new(Some(21)).with_arch(Some(Architecture::Amd64));
        assert_eq!(ids(&resolve(&catalog, &request, LibC::Glibc)), vec!["x64", "amd64"]);

        let request = PackageRequest::new(Some(21)).with_arch(Some(Architecture::X64));
        assert_eq!(ids(&resolve(&catalog, &request, LibC::Glibc)), vec!["x64"]);

        let request = PackageRequest::new(Some(21));
        assert_eq!(resolve(&catalog, &request, LibC::Glibc).len(), 4);
    }

    #[test]
    fn test_result_is_filtered_subset_in_order() {
        let mut catalog = Vec::new();
        for (i, (os, arch, distro, libc)) in [
            ("linux", "x64", "temurin", "glibc"),
            ("linux", "aarch64", "zulu", "glibc"),
            ("windows", "x64", "microsoft", "c_std_lib"),
            ("macos", "aarch64", "corretto", "libc"),
            ("linux", "x64", "zulu", "musl"),
            ("alpine_linux", "x64", "temurin", "musl"),
        ]
        .iter()
        .enumerate()
        {
            for jdk in [11, 17, 21] {
                catalog.push(package_for(&format!("p{i}-{jdk}"), jdk, distro, os, arch, libc));
            }
        }

        let requests = [
            PackageRequest::new(None),
            linux_x64(Some(17)),
            PackageRequest::new(Some(21)).with_distro(Some(Distribution::Zulu)),
            PackageRequest::new(None).with_os(Some(OperatingSystem::Windows)),
            PackageRequest::new(Some(11)).with_arch(Some(Architecture::Aarch64)),
        ];

        for request in requests {
            for host_libc in [LibC::Glibc, LibC::Musl] {
                let resolved = resolve(&catalog, &request, host_libc);
                assert!(!resolved.is_empty(), "{request}");
                for package in &resolved {
                    assert!(request.matches(package, host_libc));
                    assert!(catalog.iter().any(|p| p.id() == package.id()));
                }
                for pair in resolved.windows(2) {
                    assert_ne!(pair[0].catalog_order(&pair[1]), std::cmp::Ordering::Greater);
                }
                if request.version.is_none() {
                    assert!(resolved.iter().all(|p| p.jdk_version() == 21));
                }
            }
        }
    }

    #[test]
    fn test_request_display() {
        let request = linux_x64(Some(17)).with_distro(Some(Distribution::Temurin));
        assert_eq!(request.to_string(), "temurin 17 - linux x64");
        assert_eq!(
            request.with_arch(None).to_string(),
            "temurin 17 - linux ANY"
        );
    }
}
