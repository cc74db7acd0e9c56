//! HTTP request data and the transport seam.
//!
//! # Design
//! Requests are described as plain data. The core builds `HttpRequest`
//! values and decodes raw response bytes, but never opens a socket itself:
//! a `Transport` supplied by the caller performs the round-trip. Auth, TLS,
//! pooling, timeouts and retries all live behind that trait.
//!
//! The transport returns the body on any HTTP status. Whether a call failed
//! is decided by the response envelope, not by the status line.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `path` is relative to the API root (for example
/// `/project/acme/service`); the transport owns the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Opaque failure raised by a transport (connection, timeout, auth...).
pub type TransportError = Box<dyn Error + Send + Sync + 'static>;

/// Executes `HttpRequest`s on behalf of the core.
///
/// Implementations must return the raw response body for every HTTP status
/// and reserve `Err` for failures where no body was obtained at all.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        (**self).execute(request)
    }
}
