//! Response envelope decoding.
//!
//! Every response body is an object of the form
//!
//! ```json
//! { "errors": [{ "status": 404, "message": "..." }], "message": "...", "<payload-key>": ... }
//! ```
//!
//! A non-empty `errors` list means the call failed, whatever the HTTP status
//! and whatever else the body contains. With no errors the payload is
//! authoritative, and a missing payload key is a successful empty result.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;

/// One entry of the envelope's `errors` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub status: u16,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub more_info: String,
}

/// The generic envelope, with the payload flattened in next to the error
/// fields.
#[derive(Debug, Deserialize)]
pub struct Envelope<P> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<ErrorDetail>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: P,
}

/// Payload shape for calls that return nothing.
#[derive(Debug, Default, Deserialize)]
pub struct NoPayload {}

/// Decode `body` and return its payload, or the failure it reports.
pub fn decode<P: DeserializeOwned>(body: &[u8]) -> Result<P, ApiError> {
    let envelope: Envelope<P> = serde_json::from_slice(body).map_err(ApiError::Decode)?;
    if !envelope.errors.is_empty() {
        let message = envelope.message.unwrap_or_default();
        debug!(
            statuses = ?envelope.errors.iter().map(|e| e.status).collect::<Vec<_>>(),
            %message,
            "envelope reported errors"
        );
        return Err(ApiError::Api {
            message,
            errors: envelope.errors,
        });
    }
    Ok(envelope.payload)
}

/// Treat an explicit JSON `null` the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
