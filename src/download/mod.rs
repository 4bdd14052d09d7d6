//! Archive download and checksum verification.
//!
//! Archives are stored in the JDK cache under their catalog file name. An
//! archive already on disk is never fetched again but is still verified
//! whenever a checksum can be found.
mod checksum;
mod client;
mod progress;

pub use checksum::{Checksum, calculate, verify};
pub use client::{AttohttpcClient, DEFAULT_TIMEOUT, HttpClient, HttpResponse};
pub use progress::{IndicatifProgressReporter, ProgressReporter};

use crate::diagnostics::SearchLog;
use crate::error::{ProvisionerError, Result};
use crate::models::descriptor::{PackageDescriptor, PackageDetail};
use crate::paths::cache;
use log::{debug, info, warn};
use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

const DOWNLOAD_CHUNK_SIZE: usize = 8192;

pub struct Downloader {
    http_client: Box<dyn HttpClient>,
    cache_dir: PathBuf,
    offline: bool,
    show_progress: bool,
}

impl Downloader {
    pub fn new(cache_dir: &Path, offline: bool) -> Self {
        Self::with_client(Box::new(AttohttpcClient::new()), cache_dir, offline)
    }

    pub fn with_client(http_client: Box<dyn HttpClient>, cache_dir: &Path, offline: bool) -> Self {
        Self {
            http_client,
            cache_dir: cache_dir.to_path_buf(),
            offline,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_client.set_timeout(timeout);
        self
    }

    /// Make the archive for `package` available locally and verify it.
    ///
    /// `detail` is the package's catalog detail, if it could be obtained; it
    /// supplies the checksum and may override the download link.
    pub fn download(
        &self,
        package: &PackageDescriptor,
        detail: Option<&PackageDetail>,
        log: &mut SearchLog,
    ) -> Result<PathBuf> {
        let checksum = detail.and_then(|detail| self.resolve_checksum(detail, log));
        let url = detail
            .and_then(|detail| detail.direct_download_uri.as_deref())
            .or_else(|| package.download_redirect());

        let archive = cache::archive_file(&self.cache_dir, package.filename())?;
        if archive.exists() {
            debug!("Archive already downloaded: {}", archive.display());
        } else {
            if self.offline {
                return Err(ProvisionerError::NetworkUnavailable(format!(
                    "Offline mode, can't download {} ({})",
                    package.filename(),
                    package.id()
                )));
            }
            let Some(url) = url else {
                return Err(ProvisionerError::DownloadFailed(format!(
                    "{} ({}): no download link",
                    package.filename(),
                    package.id()
                )));
            };

            log.push(format!("Downloading {url}"));
            self.fetch(url, &archive, package)?;
        }

        match checksum {
            Some(checksum) => {
                log.push("Verifying checksums");
                verify(&archive, &checksum)?;
                log.push(format!("  {} Validated", checksum.kind));
            }
            None => log.push("  No checksum found, assuming existing file is valid"),
        }

        Ok(archive)
    }

    /// The embedded checksum if present, otherwise the published checksum
    /// file when online. Anything unusable is logged and ignored.
    fn resolve_checksum(&self, detail: &PackageDetail, log: &mut SearchLog) -> Option<Checksum> {
        match detail.embedded_checksum() {
            Some(Ok((kind, expected))) => return Some(Checksum::new(kind, expected)),
            Some(Err(name)) => {
                warn!(
                    "Unknown checksum type {name}: {}",
                    detail.checksum.as_deref().unwrap_or_default()
                );
                log.push(format!("Unknown Checksum {name}"));
                return None;
            }
            None => {}
        }

        let uri = detail.checksum_uri.as_deref()?;
        if self.offline {
            return None;
        }

        match self.http_client.get_text(uri) {
            Ok(contents) => match Checksum::from_checksum_file(&contents) {
                Ok(checksum) => Some(checksum),
                Err(token) => {
                    warn!("Unknown checksum format from {uri}: {token}");
                    log.push(format!("Unknown Checksum {token}"));
                    None
                }
            },
            Err(e) => {
                warn!("Failed to download checksum from {uri}: {e}");
                log.push(format!("Failed to download checksum from {uri}"));
                None
            }
        }
    }

    fn fetch(&self, url: &str, destination: &Path, package: &PackageDescriptor) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let mut response = self.http_client.get(url)?;
        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(ProvisionerError::DownloadFailed(format!(
                "{} from {url}: HTTP status {status}",
                package.filename()
            )));
        }

        let total = response
            .header("Content-Length")
            .and_then(|length| length.parse::<u64>().ok())
            .unwrap_or(0);

        let mut reporter: Option<Box<dyn ProgressReporter>> = if self.show_progress {
            Some(Box::new(IndicatifProgressReporter::new(package.filename())))
        } else {
            None
        };
        if let Some(reporter) = &mut reporter {
            reporter.on_start(total);
        }

        // Partial downloads stay in the temporary file and are removed on error.
        let temp = NamedTempFile::new_in(&self.cache_dir)?;
        let mut writer = BufWriter::new(temp.as_file());
        let mut downloaded = 0u64;
        let mut buffer = vec![0; DOWNLOAD_CHUNK_SIZE];

        loop {
            match response.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    writer.write_all(&buffer[..n])?;
                    downloaded += n as u64;
                    if let Some(reporter) = &mut reporter {
                        reporter.on_progress(downloaded);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(ProvisionerError::DownloadFailed(format!(
                        "{} from {url}: {e}",
                        package.filename()
                    )));
                }
            }
        }
        writer.flush()?;
        drop(writer);

        temp.persist(destination).map_err(|e| e.error)?;
        if let Some(reporter) = &mut reporter {
            reporter.on_complete();
        }
        info!("Downloaded {} ({downloaded} bytes)", package.filename());
        Ok(())
    }
}
