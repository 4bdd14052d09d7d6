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

use crate::error::{ProvisionerError, Result};
use crate::models::package::ChecksumType;
use digest::DynDigest;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const CHECKSUM_CHUNK_SIZE: usize = 8192;

/// An expected digest and the algorithm that produces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    pub kind: ChecksumType,
    pub expected: String,
}

impl Checksum {
    pub fn new(kind: ChecksumType, expected: &str) -> Self {
        Self {
            kind,
            expected: expected.trim().to_lowercase(),
        }
    }

    /// Parse a published checksum file: the digest is the first
    /// whitespace-separated token, its algorithm inferred from its length.
    pub fn from_checksum_file(contents: &str) -> std::result::Result<Self, String> {
        let token = contents.split_whitespace().next().unwrap_or_default();
        match ChecksumType::infer(token) {
            Some(kind) => Ok(Self::new(kind, token)),
            None => Err(token.to_string()),
        }
    }
}

enum Hasher {
    Md5(md5::Context),
    Digest(Box<dyn DynDigest>),
}

impl Hasher {
    fn new(kind: ChecksumType) -> Self {
        match kind {
            ChecksumType::Md5 => Hasher::Md5(md5::Context::new()),
            ChecksumType::Sha1 => Hasher::Digest(Box::new(sha1::Sha1::default())),
            ChecksumType::Sha256 => Hasher::Digest(Box::new(sha2::Sha256::default())),
            ChecksumType::Sha512 => Hasher::Digest(Box::new(sha2::Sha512::default())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Md5(context) => context.consume(data),
            Hasher::Digest(digest) => digest.update(data),
        }
    }

    fn finalize(self) -> String {
        match self {
            Hasher::Md5(context) => format!("{:x}", context.compute()),
            Hasher::Digest(digest) => hex::encode(digest.finalize()),
        }
    }
}

/// Hex digest of the file at `path`.
pub fn calculate(path: &Path, kind: ChecksumType) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Hasher::new(kind);
    let mut buffer = vec![0u8; CHECKSUM_CHUNK_SIZE];

    loop {
        match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buffer[..n]),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(hasher.finalize())
}

/// Fail with [`ProvisionerError::Corrupt`] unless the file matches. The file
/// is left in place either way.
pub fn verify(path: &Path, checksum: &Checksum) -> Result<()> {
    let actual = calculate(path, checksum.kind)?;
    if actual.eq_ignore_ascii_case(&checksum.expected) {
        debug!("  {} Validated", checksum.kind);
        return Ok(());
    }

    debug!("  {} Invalid", checksum.kind);
    debug!("    Expected: {}", checksum.expected);
    debug!("    Actual:   {actual}");
    Err(ProvisionerError::Corrupt {
        path: path.to_path_buf(),
        algorithm: checksum.kind.to_string(),
        expected: checksum.expected.clone(),
        actual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_calculate_every_algorithm() {
        let file = file_with(b"Hello, World!");
        assert_eq!(
            calculate(file.path(), ChecksumType::Sha256).unwrap(),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
        assert_eq!(
            calculate(file.path(), ChecksumType::Sha1).unwrap(),
            "0a0a9f2a6772942557ab5355d76af442f8f65e01"
        );
        assert_eq!(
            calculate(file.path(), ChecksumType::Md5).unwrap(),
            "65a8e27d8879283831b664bd8b7f0ad4"
        );
        assert_eq!(calculate(file.path(), ChecksumType::Sha512).unwrap().len(), 128);
    }

    #[test]
    fn test_verify_success() {
        let file = file_with(b"Test content");
        let checksum = Checksum::new(
            ChecksumType::Sha256,
            "9D9595C5D94FB65B824F56E9999527DBA9542481580D69FEB89056AABAA0AA87",
        );
        assert!(verify(file.path(), &checksum).is_ok());
    }

    #[test]
    fn test_verify_mismatch_is_corrupt() {
        let file = file_with(b"Test content, altered");
        let checksum = Checksum::new(
            ChecksumType::Sha256,
            "9d9595c5d94fb65b824f56e9999527dba9542481580d69feb89056aabaa0aa87",
        );

        let error = verify(file.path(), &checksum).unwrap_err();
        match error {
            ProvisionerError::Corrupt {
                algorithm, expected, ..
            } => {
                assert_eq!(algorithm, "sha256");
                assert!(expected.starts_with("9d9595"));
            }
            other => panic!("Expected Corrupt, got {other:?}"),
        }
        assert!(file.path().exists());
    }

    #[test]
    fn test_checksum_file_parsing() {
        let sha256 = "9d9595c5d94fb65b824f56e9999527dba9542481580d69feb89056aabaa0aa87";
        let parsed =
            Checksum::from_checksum_file(&format!("{sha256}  OpenJDK17U-jdk_x64_linux.tar.gz\n"))
                .unwrap();
        assert_eq!(parsed.kind, ChecksumType::Sha256);
        assert_eq!(parsed.expected, sha256);

        let parsed = Checksum::from_checksum_file("65a8e27d8879283831b664bd8b7f0ad4\n").unwrap();
        assert_eq!(parsed.kind, ChecksumType::Md5);

        assert_eq!(
            Checksum::from_checksum_file("<html>Not Found</html>"),
            Err("<html>Not".to_string())
        );
        assert_eq!(Checksum::from_checksum_file(""), Err(String::new()));
    }
}
