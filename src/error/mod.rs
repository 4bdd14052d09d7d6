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

mod exit_codes;
mod format;

pub use exit_codes::get_exit_code;
pub use format::{format_error_chain, format_error_with_color};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionerError {
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("Failed to parse catalog response: {0}")]
    ParseFailure(String),

    #[error("Catalog returned no packages: {0}")]
    EmptyCatalog(String),

    #[error("Failed to download {0}")]
    DownloadFailed(String),

    #[error("Checksum mismatch for {path:?} ({algorithm}): expected {expected}, got {actual}")]
    Corrupt {
        path: PathBuf,
        algorithm: String,
        expected: String,
        actual: String,
    },

    #[error("Archive {archive:?} contains an entry escaping the target directory: {entry}")]
    PathTraversal { archive: PathBuf, entry: String },

    #[error("Catalog file name would escape the cache directory: {0:?}")]
    UnsafeFileName(String),

    #[error("Extracting {archive:?} did not produce {expected:?}")]
    IncompleteExtraction { archive: PathBuf, expected: PathBuf },

    #[error("{message}")]
    NotFound { message: String, log: Vec<String> },

    #[error("{message}")]
    ProvisionFailed {
        message: String,
        log: Vec<String>,
        #[source]
        source: Option<Box<ProvisionerError>>,
    },

    #[error("Unsupported archive format: {0}")]
    UnsupportedArchive(String),

    #[error("Invalid version format: {0}")]
    InvalidVersion(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] attohttpc::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

impl ProvisionerError {
    /// Diagnostic trail attached to the error, if any.
    pub fn log(&self) -> &[String] {
        match self {
            ProvisionerError::NotFound { log, .. } => log,
            ProvisionerError::ProvisionFailed { log, .. } => log,
            _ => &[],
        }
    }

    /// The innermost error wrapped by provisioning failures.
    pub fn root_cause(&self) -> &ProvisionerError {
        match self {
            ProvisionerError::ProvisionFailed {
                source: Some(source),
                ..
            } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the failure was an aborted extraction of a malicious archive
    /// or a catalog entry naming a file outside the cache.
    pub fn is_security_violation(&self) -> bool {
        matches!(
            self.root_cause(),
            ProvisionerError::PathTraversal { .. } | ProvisionerError::UnsafeFileName(_)
        )
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self.root_cause(), ProvisionerError::Corrupt { .. })
    }
}

pub type Result<T> = std::result::Result<T, ProvisionerError>;
