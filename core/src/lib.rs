//! Client core for a cloud provider's service API.
//!
//! # Overview
//! Builds requests for the project-scoped `service` resource, hands them to
//! a caller-supplied `Transport`, and decodes the JSON envelope every
//! response is wrapped in. Also extracts host and port from a service's
//! connection URI.
//!
//! # Design
//! - The core does no I/O of its own. `Transport` is the only seam to the
//!   network; auth, TLS, retries and timeouts live behind it.
//! - `ServicesHandler` holds nothing but its transport. Each operation is
//!   also available as a pure `build_*` / `parse_*` pair.
//! - A response with a non-empty `errors` list is a failure whatever its
//!   HTTP status.

pub mod client;
pub mod envelope;
pub mod error;
pub mod http;
pub mod types;
pub mod uri;

pub use client::{
    build_create_service, build_delete_service, build_get_service, build_list_services,
    build_update_service, parse_delete, parse_service, parse_service_list, ServicesHandler,
};
pub use envelope::{decode, Envelope, ErrorDetail, NoPayload};
pub use error::{ApiError, UriError};
pub use http::{HttpMethod, HttpRequest, Transport, TransportError};
pub use types::{CreateServiceRequest, Service, ServiceUser, UpdateServiceRequest};
pub use uri::host_port;
