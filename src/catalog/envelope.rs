//! The catalog's response wrapper: `{ "message": ..., "result": [...] }`.

use crate::error::{ProvisionerError, Result};
use log::{debug, trace};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default, with = "crate::models::json")]
    message: Option<String>,
    result: Option<Vec<T>>,
}

/// Parse an envelope from `body`. A body that is not JSON or has no
/// `result` array fails with [`ProvisionerError::ParseFailure`]; an empty
/// array is returned as such.
pub fn parse<T: DeserializeOwned>(body: &str, url: &str) -> Result<Vec<T>> {
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| {
        trace!("Response body: {body}");
        ProvisionerError::ParseFailure(format!("Invalid response from {url}: {e}"))
    })?;

    if let Some(message) = envelope.message.as_deref() {
        debug!("Catalog message from {url}: {message}");
    }

    envelope.result.ok_or_else(|| {
        ProvisionerError::ParseFailure(format!("Response from {url} has no 'result' field"))
    })
}
