//! Error types for the service API client.
//!
//! # Design
//! Every failure a caller can see is one `ApiError` value. Remote failures
//! reported through the response envelope land in `Api` together with the
//! structured error list; transport failures are boxed and passed through
//! untouched so callers can still downcast them. URI problems have their own
//! `UriError` because the host/port accessors are usable without any API
//! call.

use thiserror::Error;

use crate::envelope::ErrorDetail;
use crate::http::TransportError;

/// Failures while extracting host and port from a connection URI.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UriError {
    /// The string is not a syntactically valid URI.
    #[error("malformed URI {uri:?}: {reason}")]
    Malformed { uri: String, reason: String },

    /// The authority does not split into exactly `host:port`.
    #[error("invalid host {authority:?}: expected exactly host:port")]
    InvalidHost { authority: String },
}

/// Errors returned by the service handler and its build/parse halves.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Uri(#[from] UriError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body is not valid JSON or does not match the envelope.
    #[error("decoding response failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The envelope carried a non-empty `errors` list.
    #[error("API error: {message}")]
    Api {
        message: String,
        errors: Vec<ErrorDetail>,
    },

    /// The transport failed before producing a response body.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),
}

impl ApiError {
    /// First HTTP-style status reported in the envelope, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { errors, .. } => errors.first().map(|e| e.status),
            _ => None,
        }
    }
}
