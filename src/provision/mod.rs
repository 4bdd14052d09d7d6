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

//! Provisioning: resolve a package from the catalog, download, verify,
//! extract, then probe the result.

use crate::archive::ArchiveExtractor;
use crate::catalog::{Catalog, PackageRequest};
use crate::diagnostics::SearchLog;
use crate::discovery::{LocatorChain, Probe};
use crate::download::Downloader;
use crate::error::{ProvisionerError, Result};
use crate::models::descriptor::PackageDescriptor;
use crate::models::distribution::Distribution;
use crate::models::install::JavaInstall;
use crate::models::package::ArchiveFormat;
use crate::paths::cache;
use crate::paths::shared::ensure_directory;
use crate::platform::HostFacts;
use log::info;
use std::path::{Path, PathBuf};

pub struct Provisioner {
    host: HostFacts,
    catalog: Catalog,
    downloader: Downloader,
    extractor: ArchiveExtractor,
    cache_dir: PathBuf,
    log: SearchLog,
}

impl Provisioner {
    pub fn new(host: HostFacts, catalog: Catalog, downloader: Downloader, cache_dir: &Path) -> Self {
        Self {
            extractor: ArchiveExtractor::new(&host),
            host,
            catalog,
            downloader,
            cache_dir: cache_dir.to_path_buf(),
            log: SearchLog::new(),
        }
    }

    /// Install the best package for `version` on this host.
    pub fn provision(
        &mut self,
        version: Option<u32>,
        distro: Option<Distribution>,
    ) -> Result<JavaInstall> {
        let request = PackageRequest::new(version)
            .with_os(Some(self.host.os))
            .with_arch(Some(self.host.arch))
            .with_distro(distro);
        self.provision_request(request)
    }

    /// Install the best package matching `request`. If nothing matches, the
    /// request is retried once with any architecture.
    pub fn provision_request(&mut self, request: PackageRequest) -> Result<JavaInstall> {
        self.log.clear();
        let packages = match self.candidates(&request) {
            Ok(packages) => packages,
            Err(first) if request.arch.is_some() => {
                self.log
                    .push(format!("Failed to find any JDKs from Disco for: {request}"));

                let relaxed = request.with_arch(None);
                match self.candidates(&relaxed) {
                    Ok(packages) => packages,
                    Err(second) => {
                        self.log
                            .push(format!("Failed to find any JDKs from Disco for: {relaxed}"));
                        info!("Retry with any architecture also failed: {first}");
                        return Err(self.failure("Failed to provision Disco download", second));
                    }
                }
            }
            Err(e) => {
                self.log
                    .push(format!("Failed to find any JDKs from Disco for: {request}"));
                return Err(self.failure("Failed to provision Disco download", e));
            }
        };

        self.log
            .push(format!("Found {} download candidates", packages.len()));
        let package = &packages[0];
        if let Some(distro) = package.distro() {
            info!("Installing {} from {}", package.filename(), distro.display_name());
        }
        self.log.push(format!(
            "Selected {}: {}",
            package
                .distro()
                .map_or("unknown".to_string(), |distro| distro.to_string()),
            package.filename()
        ));

        let home = match self.install(package) {
            Ok(home) => home,
            Err(e) => {
                let message = format!("Failed to provision Disco download: {}", package.filename());
                return Err(self.failure(&message, e));
            }
        };

        match Probe::new(self.host).probe_home(&home, &mut self.log) {
            Some(install) => {
                info!("Provisioned {install}");
                Ok(install)
            }
            None => Err(ProvisionerError::ProvisionFailed {
                message: format!("Failed to provision Disco download: {}", package.filename()),
                log: self.log.lines().to_vec(),
                source: None,
            }),
        }
    }

    /// Lines recorded by the latest provisioning attempt.
    pub fn log(&self) -> &[String] {
        self.log.lines()
    }

    fn candidates(&self, request: &PackageRequest) -> Result<Vec<PackageDescriptor>> {
        let packages = self.catalog.resolve(request, self.host.libc)?;
        if packages.is_empty() {
            return Err(ProvisionerError::EmptyCatalog(format!(
                "no packages match {request}"
            )));
        }
        Ok(packages)
    }

    fn install(&mut self, package: &PackageDescriptor) -> Result<PathBuf> {
        let detail = match self.catalog.detail(package) {
            Ok(detail) => Some(detail),
            Err(e) => {
                info!("Package info unavailable: {e}");
                self.log.push(format!(
                    "Failed to download package info for \"{}\" ({}) , assuming redirect link is valid",
                    package.filename(),
                    package.id()
                ));
                None
            }
        };

        let format = package
            .archive()
            .or_else(|| ArchiveFormat::by_filename(package.filename()))
            .filter(|format| format.is_extractable())
            .ok_or_else(|| ProvisionerError::UnsupportedArchive(package.filename().to_string()))?;

        let destination = cache::extracted_dir(&self.cache_dir, package.filename())?;
        ensure_directory(self.cache_dir.clone())?;
        let archive = self
            .downloader
            .download(package, detail.as_ref(), &mut self.log)?;

        self.extractor.extract(&archive, &destination, format)
    }

    fn failure(&self, message: &str, source: ProvisionerError) -> ProvisionerError {
        ProvisionerError::ProvisionFailed {
            message: message.to_string(),
            log: self.log.lines().to_vec(),
            source: Some(Box::new(source)),
        }
    }
}

/// Search the machine first and provision only when nothing is installed.
///
/// A failed provisioning attempt reports the discovery trail followed by the
/// provisioning trail.
pub fn find_or_provision(
    chain: &mut LocatorChain,
    provisioner: &mut Provisioner,
    version: Option<u32>,
    distro: Option<Distribution>,
) -> Result<JavaInstall> {
    let searched = match chain.find(version) {
        Ok(install) => return Ok(install),
        Err(ProvisionerError::NotFound { log, .. }) => log,
        Err(e) => return Err(e),
    };

    provisioner.provision(version, distro).map_err(|e| match e {
        ProvisionerError::ProvisionFailed {
            message,
            log,
            source,
        } => {
            let mut combined = searched;
            combined.push("Provisioner:".to_string());
            combined.extend(log.into_iter().map(|line| format!("  {line}")));
            ProvisionerError::ProvisionFailed {
                message,
                log: combined,
                source,
            }
        }
        other => other,
    })
}
