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

use crate::catalog::envelope;
use crate::config::{DEFAULT_API_BASE_URL, ProvisionerConfig};
use crate::error::{ProvisionerError, Result};
use crate::models::descriptor::{PackageDescriptor, PackageDetail};
use crate::user_agent;
use attohttpc::Session;
use log::debug;
use std::time::Duration;

const DEFAULT_TIMEOUT: u64 = 60;

/// Archive types the extractor understands, sent as a server-side filter.
const ARCHIVE_TYPES: &str = "zip,tar,tar.gz,tgz";

/// Blocking client for the package catalog's list and detail endpoints.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    session: Session,
    base_url: String,
}

impl CatalogClient {
    pub fn new() -> Self {
        let mut session = Session::new();
        session.header("User-Agent", user_agent::catalog_client());
        session.timeout(Duration::from_secs(DEFAULT_TIMEOUT));
        session.proxy_settings(attohttpc::ProxySettings::from_env());

        Self {
            session,
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &ProvisionerConfig) -> Self {
        Self::new()
            .with_base_url(config.api_base_url.clone())
            .with_timeout(Duration::from_secs(config.request_timeout_secs))
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.session.timeout(timeout);
        self
    }

    pub fn packages_url(&self) -> String {
        format!(
            "{}/packages/?&package_type=jdk&directly_downloadable=true&archive_type={ARCHIVE_TYPES}",
            self.base_url
        )
    }

    pub fn detail_url(&self, id: &str) -> String {
        format!("{}/ids/{id}", self.base_url)
    }

    /// Download the full package list. An empty list is an error.
    pub fn fetch_packages(&self) -> Result<Vec<PackageDescriptor>> {
        let url = self.packages_url();
        debug!("Downloading package list from {url}");

        let packages: Vec<PackageDescriptor> = envelope::parse(&self.get_text(&url)?, &url)?;
        if packages.is_empty() {
            return Err(ProvisionerError::EmptyCatalog(url));
        }
        Ok(packages)
    }

    /// Download the detail entries for package `id`. The endpoint is
    /// expected to return exactly one.
    pub fn fetch_detail(&self, id: &str) -> Result<Vec<PackageDetail>> {
        let url = self.detail_url(id);
        debug!("Downloading package info from {url}");

        let details: Vec<PackageDetail> = envelope::parse(&self.get_text(&url)?, &url)?;
        if details.is_empty() {
            return Err(ProvisionerError::EmptyCatalog(url));
        }
        Ok(details)
    }

    fn get_text(&self, url: &str) -> Result<String> {
        let response = self.session.get(url).send().map_err(|e| {
            ProvisionerError::NetworkUnavailable(format!("Failed to connect to {url}: {e}"))
        })?;

        if !response.is_success() {
            let status = response.status();
            return Err(ProvisionerError::NetworkUnavailable(format!(
                "HTTP error ({}) from {url}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        response.text().map_err(|e| {
            ProvisionerError::NetworkUnavailable(format!("Failed to read response from {url}: {e}"))
        })
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}
