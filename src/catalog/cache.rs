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

//! On-disk JSON cache for the package list and per-package details.
//!
//! Freshness is the file's modification time. Entries older than
//! [`CACHE_TTL`] are ignored unless offline, where stale data is preferred
//! to none. Writes go to a temporary sibling that is renamed into place;
//! no lock is taken, so concurrent processes sharing a cache directory race
//! and the last writer wins.

use crate::error::{ProvisionerError, Result};
use crate::models::descriptor::{DownloadRecord, PackageDescriptor};
use crate::paths::cache;
use crate::platform::file_ops;
use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const CACHE_TTL: TimeDelta = TimeDelta::hours(12);

#[derive(Debug, Clone)]
pub struct CatalogCache {
    dir: PathBuf,
    offline: bool,
}

impl CatalogCache {
    pub fn new(dir: &Path, offline: bool) -> Self {
        Self {
            dir: dir.to_path_buf(),
            offline,
        }
    }

    pub fn read_packages(&self) -> Option<Vec<PackageDescriptor>> {
        self.read(&cache::packages_file(&self.dir))
    }

    pub fn write_packages(&self, packages: &[PackageDescriptor]) -> Result<()> {
        self.write(&cache::packages_file(&self.dir), &packages)
    }

    pub fn read_detail(&self, filename: &str) -> Option<DownloadRecord> {
        match cache::detail_file(&self.dir, filename) {
            Ok(path) => self.read(&path),
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }

    pub fn write_detail(&self, record: &DownloadRecord) -> Result<()> {
        self.write(&cache::detail_file(&self.dir, record.package.filename())?, record)
    }

    fn read<T: DeserializeOwned>(&self, path: &Path) -> Option<T> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(_) => {
                debug!("Failed to find cache file: {}", path.display());
                return None;
            }
        };

        if !self.offline && metadata.modified().map(is_stale).unwrap_or(true) {
            debug!("Cache file is stale: {}", path.display());
            return None;
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read cache file {}: {e}", path.display());
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Failed to parse cache file {}: {e}", path.display());
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            ProvisionerError::ConfigError(format!(
                "Failed to create cache directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let json = serde_json::to_string_pretty(value)?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        file_ops::atomic_rename(&temp_path, path)?;
        debug!("Wrote cache file {}", path.display());
        Ok(())
    }
}

fn is_stale(modified: std::time::SystemTime) -> bool {
    let modified: DateTime<Utc> = modified.into();
    Utc::now() - modified > CACHE_TTL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::descriptor::PackageDetail;
    use crate::test::fixtures::package;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn age(path: &Path, hours: u64) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(hours * 3600))
            .unwrap();
    }

    #[test]
    fn test_packages_roundtrip() {
        let temp = TempDir::new().unwrap();
        let cache = CatalogCache::new(temp.path(), false);
        assert!(cache.read_packages().is_none());

        cache
            .write_packages(&[package("a", 21, "temurin"), package("b", 22, "zulu")])
            .unwrap();
        let packages = cache.read_packages().unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[1].id(), "b");
        assert!(!temp.path().join("packages.json.tmp").exists());
    }

    #[test]
    fn test_stale_entries_ignored_unless_offline() {
        let temp = TempDir::new().unwrap();
        CatalogCache::new(temp.path(), false)
            .write_packages(&[package("a", 21, "temurin")])
            .unwrap();
        age(&temp.path().join("packages.json"), 13);

        assert!(CatalogCache::new(temp.path(), false).read_packages().is_none());
        assert_eq!(
            CatalogCache::new(temp.path(), true)
                .read_packages()
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_recent_entries_are_fresh() {
        let temp = TempDir::new().unwrap();
        let cache = CatalogCache::new(temp.path(), false);
        cache.write_packages(&[package("a", 21, "temurin")]).unwrap();
        age(&temp.path().join("packages.json"), 11);
        assert!(cache.read_packages().is_some());
    }

    #[test]
    fn test_detail_keyed_by_filename() {
        let temp = TempDir::new().unwrap();
        let cache = CatalogCache::new(temp.path(), false);
        let record = DownloadRecord {
            package: package("a", 21, "temurin"),
            info: PackageDetail {
                checksum: Some("abc".to_string()),
                checksum_type: Some("sha256".to_string()),
                signature_uri: None,
                ..Default::default()
            },
        };
        cache.write_detail(&record).unwrap();

        let path = temp.path().join("a-jdk21-linux_x64.tar.gz.json");
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"signature_uri\": null"));

        let read = cache.read_detail("a-jdk21-linux_x64.tar.gz").unwrap();
        assert_eq!(read.package.id(), "a");
        assert_eq!(read.info, record.info);
    }

    #[test]
    fn test_corrupt_cache_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("packages.json"), "{not json").unwrap();
        assert!(CatalogCache::new(temp.path(), true).read_packages().is_none());
    }
}
