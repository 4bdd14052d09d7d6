use crate::error::ProvisionerError;

/// Process exit status for a failed command.
pub fn get_exit_code(error: &ProvisionerError) -> i32 {
    match error.root_cause() {
        ProvisionerError::InvalidVersion(_)
        | ProvisionerError::ConfigError(_)
        | ProvisionerError::UnsupportedArchive(_) => 2,

        ProvisionerError::NotFound { .. } => 4,

        ProvisionerError::PathTraversal { .. }
        | ProvisionerError::UnsafeFileName(_)
        | ProvisionerError::Corrupt { .. } => 13,

        ProvisionerError::NetworkUnavailable(_)
        | ProvisionerError::Http(_)
        | ProvisionerError::DownloadFailed(_) => 20,

        ProvisionerError::ParseFailure(_) | ProvisionerError::EmptyCatalog(_) => 21,

        _ => 1,
    }
}
