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

use crate::models::distribution::Distribution;
use crate::models::package::{ArchiveFormat, ChecksumType, LibC};
use crate::models::platform::{Architecture, OperatingSystem};
use crate::models::variant::Variant;
use crate::version::JavaVersion;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, with = "crate::models::json")]
    pub pkg_info_uri: Option<String>,
    #[serde(default, with = "crate::models::json")]
    pub pkg_download_redirect: Option<String>,
}

/// A package entry exactly as the catalog sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPackage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub major_version: u32,
    #[serde(default)]
    pub jdk_version: u32,
    #[serde(default)]
    pub javafx_bundled: bool,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub size: u64,
    #[serde(default, with = "crate::models::json")]
    pub java_version: Option<String>,
    #[serde(default, with = "crate::models::json")]
    pub archive_type: Option<String>,
    #[serde(default, with = "crate::models::json")]
    pub distribution: Option<String>,
    #[serde(default, with = "crate::models::json")]
    pub operating_system: Option<String>,
    #[serde(default, with = "crate::models::json")]
    pub lib_c_type: Option<String>,
    #[serde(default, with = "crate::models::json")]
    pub architecture: Option<String>,
}

/// One downloadable package from the catalog.
///
/// The classification fields are derived from the raw strings once, when the
/// descriptor is built, and never change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawPackage", into = "RawPackage")]
pub struct PackageDescriptor {
    raw: RawPackage,
    java_version: Option<JavaVersion>,
    archive: Option<ArchiveFormat>,
    distro: Option<Distribution>,
    os: Option<OperatingSystem>,
    libc: Option<LibC>,
    arch: Option<Architecture>,
}

impl From<RawPackage> for PackageDescriptor {
    fn from(raw: RawPackage) -> Self {
        let archive = raw
            .archive_type
            .as_deref()
            .and_then(ArchiveFormat::by_key)
            .or_else(|| ArchiveFormat::by_filename(&raw.filename));

        Self {
            java_version: raw
                .java_version
                .as_deref()
                .and_then(|v| JavaVersion::from_str(v).ok()),
            archive,
            distro: raw.distribution.as_deref().and_then(Distribution::by_key),
            os: raw
                .operating_system
                .as_deref()
                .and_then(OperatingSystem::by_key),
            libc: raw.lib_c_type.as_deref().and_then(LibC::by_key),
            arch: raw.architecture.as_deref().and_then(Architecture::by_key),
            raw,
        }
    }
}

impl From<PackageDescriptor> for RawPackage {
    fn from(descriptor: PackageDescriptor) -> Self {
        descriptor.raw
    }
}

impl PackageDescriptor {
    pub fn raw(&self) -> &RawPackage {
        &self.raw
    }

    pub fn id(&self) -> &str {
        &self.raw.id
    }

    pub fn major_version(&self) -> u32 {
        self.raw.major_version
    }

    pub fn jdk_version(&self) -> u32 {
        self.raw.jdk_version
    }

    pub fn filename(&self) -> &str {
        &self.raw.filename
    }

    pub fn size(&self) -> u64 {
        self.raw.size
    }

    pub fn download_redirect(&self) -> Option<&str> {
        self.raw.links.pkg_download_redirect.as_deref()
    }

    pub fn java_version(&self) -> Option<&JavaVersion> {
        self.java_version.as_ref()
    }

    pub fn archive(&self) -> Option<ArchiveFormat> {
        self.archive
    }

    pub fn distro(&self) -> Option<Distribution> {
        self.distro
    }

    pub fn os(&self) -> Option<OperatingSystem> {
        self.os
    }

    pub fn libc(&self) -> Option<LibC> {
        self.libc
    }

    pub fn arch(&self) -> Option<Architecture> {
        self.arch
    }

    /// Directory name the package extracts to: the file name without its
    /// archive suffix.
    pub fn extracted_dir_name(&self) -> &str {
        extracted_dir_name(&self.raw.filename)
    }

    /// Catalog ranking: newest JDK first, then preferred distribution, then
    /// preferred libc, then newest build. Unknown values rank last.
    pub fn catalog_order(&self, other: &Self) -> Ordering {
        other
            .jdk_version()
            .cmp(&self.jdk_version())
            .then_with(|| none_last(self.distro, other.distro))
            .then_with(|| none_last(self.libc, other.libc))
            .then_with(|| {
                none_last_by(
                    self.java_version.as_ref(),
                    other.java_version.as_ref(),
                    |a, b| b.cmp(a),
                )
            })
    }
}

fn none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    none_last_by(a, b, |a, b| a.cmp(b))
}

fn none_last_by<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn extracted_dir_name(filename: &str) -> &str {
    if let Some(stem) = filename.strip_suffix(".tar.gz") {
        return stem;
    }
    match filename.rfind('.') {
        Some(index) => &filename[..index],
        None => filename,
    }
}

/// Per-package download metadata from the catalog's detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageDetail {
    #[serde(default, with = "crate::models::json")]
    pub filename: Option<String>,
    #[serde(default, with = "crate::models::json")]
    pub direct_download_uri: Option<String>,
    #[serde(default, with = "crate::models::json")]
    pub download_site_uri: Option<String>,
    #[serde(default, with = "crate::models::json")]
    pub signature_uri: Option<String>,
    #[serde(default, with = "crate::models::json")]
    pub checksum_uri: Option<String>,
    #[serde(default, with = "crate::models::json")]
    pub checksum: Option<String>,
    #[serde(default, with = "crate::models::json")]
    pub checksum_type: Option<String>,
}

impl PackageDetail {
    /// The embedded checksum if both the digest and a known algorithm are present.
    ///
    /// `Err` carries the algorithm name when the digest is present but the
    /// algorithm is not one we can compute.
    pub fn embedded_checksum(&self) -> Option<Result<(ChecksumType, &str), &str>> {
        let checksum = self.checksum.as_deref()?;
        let name = self.checksum_type.as_deref()?;
        Some(match ChecksumType::from_str(name) {
            Ok(kind) => Ok((kind, checksum)),
            Err(_) => Err(name),
        })
    }
}

/// What the detail cache stores for one package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub package: PackageDescriptor,
    pub info: PackageDetail,
}
