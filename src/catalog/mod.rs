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

//! The remote package catalog, cached on disk.

pub mod cache;
pub mod client;
pub mod envelope;
pub mod resolver;

pub use cache::CatalogCache;
pub use client::CatalogClient;
pub use resolver::{PackageRequest, resolve};

use crate::config::ProvisionerConfig;
use crate::error::{ProvisionerError, Result};
use crate::models::descriptor::{DownloadRecord, PackageDescriptor, PackageDetail};
use crate::models::package::LibC;
use log::{debug, warn};

pub struct Catalog {
    client: CatalogClient,
    cache: CatalogCache,
    offline: bool,
}

impl Catalog {
    pub fn new(client: CatalogClient, cache: CatalogCache, offline: bool) -> Self {
        Self {
            client,
            cache,
            offline,
        }
    }

    pub fn from_config(config: &ProvisionerConfig) -> Self {
        Self::new(
            CatalogClient::from_config(config),
            CatalogCache::new(&config.jdk_cache_dir(), config.offline),
            config.offline,
        )
    }

    /// The package list, from cache when fresh (or whenever offline),
    /// otherwise from the network. A fresh download is written back.
    pub fn packages(&self) -> Result<Vec<PackageDescriptor>> {
        if let Some(packages) = self.cache.read_packages() {
            debug!("Using cached package list ({} packages)", packages.len());
            return Ok(packages);
        }

        if self.offline {
            return Err(ProvisionerError::NetworkUnavailable(
                "Cannot download package list while offline".to_string(),
            ));
        }

        let packages = self.client.fetch_packages()?;
        self.cache.write_packages(&packages)?;
        Ok(packages)
    }

    /// Matching packages, best first. See [`resolve`].
    pub fn resolve(&self, request: &PackageRequest, host_libc: LibC) -> Result<Vec<PackageDescriptor>> {
        Ok(resolve(&self.packages()?, request, host_libc))
    }

    /// Download metadata for `package`, cached next to its archive.
    pub fn detail(&self, package: &PackageDescriptor) -> Result<PackageDetail> {
        if let Some(record) = self.cache.read_detail(package.filename()) {
            return Ok(record.info);
        }

        if self.offline {
            return Err(ProvisionerError::NetworkUnavailable(format!(
                "Cannot download package info for {} while offline",
                package.filename()
            )));
        }

        let mut details = self.client.fetch_detail(package.id())?;
        if details.len() > 1 {
            warn!(
                "Multiple package infos returned for {} ({}), using the first",
                package.filename(),
                package.id()
            );
        }
        let record = DownloadRecord {
            package: package.clone(),
            info: details.swap_remove(0),
        };
        self.cache.write_detail(&record)?;
        Ok(record.info)
    }
}
