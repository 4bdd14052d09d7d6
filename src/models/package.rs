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

use crate::models::variant::{Variant, VariantEntry, variant_string_impls};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    Apk,
    Cab,
    Deb,
    Dmg,
    Exe,
    Msi,
    Pkg,
    Rpm,
    Tar,
    TarGz,
    Tgz,
    Zip,
}

const fn archive(variant: ArchiveFormat, key: &'static str) -> VariantEntry<ArchiveFormat> {
    VariantEntry {
        variant,
        key,
        aliases: &[],
        parent: None,
    }
}

static ARCHIVE_FORMATS: &[VariantEntry<ArchiveFormat>] = &[
    archive(ArchiveFormat::Apk, "apk"),
    archive(ArchiveFormat::Cab, "cab"),
    archive(ArchiveFormat::Deb, "deb"),
    archive(ArchiveFormat::Dmg, "dmg"),
    archive(ArchiveFormat::Exe, "exe"),
    archive(ArchiveFormat::Msi, "msi"),
    archive(ArchiveFormat::Pkg, "pkg"),
    archive(ArchiveFormat::Rpm, "rpm"),
    archive(ArchiveFormat::Tar, "tar"),
    archive(ArchiveFormat::TarGz, "tar.gz"),
    archive(ArchiveFormat::Tgz, "tgz"),
    archive(ArchiveFormat::Zip, "zip"),
];

impl Variant for ArchiveFormat {
    fn table() -> &'static [VariantEntry<Self>] {
        ARCHIVE_FORMATS
    }

    fn index(self) -> usize {
        self as usize
    }

    // Archive formats have no aliases besides their key.
    fn by_alias(name: &str) -> Option<Self> {
        Self::by_key(&name.to_lowercase())
    }
}

variant_string_impls!(ArchiveFormat, "archive format");

impl ArchiveFormat {
    /// Guess the format from a file name's `.<key>` suffix.
    pub fn by_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        ARCHIVE_FORMATS
            .iter()
            .find(|entry| {
                lower.len() > entry.key.len() + 1
                    && lower.ends_with(entry.key)
                    && lower[..lower.len() - entry.key.len()].ends_with('.')
            })
            .map(|entry| entry.variant)
    }

    /// Whether the extractor can unpack this format.
    pub fn is_extractable(self) -> bool {
        matches!(
            self,
            ArchiveFormat::Zip | ArchiveFormat::Tar | ArchiveFormat::TarGz | ArchiveFormat::Tgz
        )
    }

    pub fn is_gzipped(self) -> bool {
        matches!(self, ArchiveFormat::TarGz | ArchiveFormat::Tgz)
    }
}

/// C runtime a package was linked against. Declaration order is preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LibC {
    Glibc,
    Libc,
    Musl,
    CStdLib,
}

static LIBCS: &[VariantEntry<LibC>] = &[
    VariantEntry {
        variant: LibC::Glibc,
        key: "glibc",
        aliases: &["glibc"],
        parent: None,
    },
    VariantEntry {
        variant: LibC::Libc,
        key: "libc",
        aliases: &["libc"],
        parent: None,
    },
    VariantEntry {
        variant: LibC::Musl,
        key: "musl",
        aliases: &["musl"],
        parent: None,
    },
    VariantEntry {
        variant: LibC::CStdLib,
        key: "c_std_lib",
        aliases: &["c_std_lib"],
        parent: None,
    },
];

impl Variant for LibC {
    fn table() -> &'static [VariantEntry<Self>] {
        LIBCS
    }

    fn index(self) -> usize {
        self as usize
    }
}

variant_string_impls!(LibC, "libc");

/// Digest algorithms the catalog publishes checksums in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumType {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

static CHECKSUM_TYPES: &[VariantEntry<ChecksumType>] = &[
    VariantEntry {
        variant: ChecksumType::Md5,
        key: "md5",
        aliases: &["md5"],
        parent: None,
    },
    VariantEntry {
        variant: ChecksumType::Sha1,
        key: "sha1",
        aliases: &["sha1", "sha-1"],
        parent: None,
    },
    VariantEntry {
        variant: ChecksumType::Sha256,
        key: "sha256",
        aliases: &["sha256", "sha-256"],
        parent: None,
    },
    VariantEntry {
        variant: ChecksumType::Sha512,
        key: "sha512",
        aliases: &["sha512", "sha-512"],
        parent: None,
    },
];

impl Variant for ChecksumType {
    fn table() -> &'static [VariantEntry<Self>] {
        CHECKSUM_TYPES
    }

    fn index(self) -> usize {
        self as usize
    }
}

variant_string_impls!(ChecksumType, "checksum type");

impl ChecksumType {
    /// Length of the hex encoding of a digest.
    pub fn hex_len(self) -> usize {
        match self {
            ChecksumType::Md5 => 32,
            ChecksumType::Sha1 => 40,
            ChecksumType::Sha256 => 64,
            ChecksumType::Sha512 => 128,
        }
    }

    /// Infer the algorithm from a bare hex digest.
    pub fn infer(digest: &str) -> Option<Self> {
        if digest.is_empty() || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        CHECKSUM_TYPES
            .iter()
            .map(|entry| entry.variant)
            .find(|variant| variant.hex_len() == digest.len())
    }
}
