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

use crate::version::JavaVersion;
use std::cmp::Ordering;
use std::path::PathBuf;
use std::str::FromStr;

/// Vendor name fragments in preference order, matched case-insensitively.
/// Vendors do not necessarily match catalog distribution names.
const PREFERRED_VENDORS: &[&[&str]] = &[
    &["microsoft"],
    &["openjdk"],
    &["temurin", "adoptium", "eclipse foundation"],
    &["azul systems"],
];

/// A Java runtime found on disk by probing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaInstall {
    pub home: PathBuf,
    pub is_jdk: bool,
    pub major_version: u32,
    pub version: Option<String>,
    pub vendor: Option<String>,
}

impl JavaInstall {
    /// Preference order between installs; the preferred install sorts first.
    pub fn install_order(&self, other: &Self) -> Ordering {
        other
            .is_jdk
            .cmp(&self.is_jdk)
            .then_with(|| other.major_version.cmp(&self.major_version))
            .then_with(|| compare_vendors(self.vendor.as_deref(), other.vendor.as_deref()))
            .then_with(|| compare_versions(self.version.as_deref(), other.version.as_deref()))
    }
}

impl std::fmt::Display for JavaInstall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({}) {}",
            if self.is_jdk { "JDK" } else { "JRE" },
            self.version.as_deref().unwrap_or("unknown"),
            self.vendor.as_deref().unwrap_or("unknown vendor"),
            self.home.display()
        )
    }
}

/// Sort installs best first.
pub fn sort_installs(installs: &mut [JavaInstall]) {
    installs.sort_by(|a, b| a.install_order(b));
}

fn vendor_rank(vendor: &str) -> Option<usize> {
    let vendor = vendor.to_lowercase();
    PREFERRED_VENDORS
        .iter()
        .position(|names| names.iter().any(|name| vendor.contains(name)))
}

fn compare_vendors(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(a), Some(b)) if a != b => match (vendor_rank(a), vendor_rank(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        },
        _ => Ordering::Equal,
    }
}

fn compare_versions(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(a), Some(b)) if a != b => {
            match (JavaVersion::from_str(a).ok(), JavaVersion::from_str(b).ok()) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.cmp(b),
            }
        }
        _ => Ordering::Equal,
    }
}
