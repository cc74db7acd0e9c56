//! Request building, response parsing and the service handler.
//!
//! # Design
//! Each operation is split into a `build_*` function that produces an
//! `HttpRequest` and a `parse_*` function that consumes the raw response
//! body. Both halves are pure, so callers that drive their own I/O can use
//! them directly. `ServicesHandler` glues them to a `Transport` for callers
//! that just want `create`/`get`/`update`/`delete`/`list`.
//!
//! Paths are `/project/{project}/service` for the collection and
//! `/project/{project}/service/{service}` for a single item. Names are
//! inserted as given.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::envelope::{decode, null_as_default, NoPayload};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, Transport};
use crate::types::{CreateServiceRequest, Service, UpdateServiceRequest};

#[derive(Deserialize)]
struct ServicePayload {
    #[serde(default)]
    service: Option<Service>,
}

#[derive(Deserialize)]
struct ServiceListPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    services: Vec<Service>,
}

fn collection_path(project: &str) -> String {
    format!("/project/{project}/service")
}

fn item_path(project: &str, service: &str) -> String {
    format!("/project/{project}/service/{service}")
}

fn bodyless(method: HttpMethod, path: String) -> HttpRequest {
    HttpRequest {
        method,
        path,
        headers: Vec::new(),
        body: None,
    }
}

fn with_json<T: Serialize>(
    method: HttpMethod,
    path: String,
    input: &T,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(input).map_err(ApiError::Serialization)?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

pub fn build_create_service(
    project: &str,
    input: &CreateServiceRequest,
) -> Result<HttpRequest, ApiError> {
    with_json(HttpMethod::Post, collection_path(project), input)
}

pub fn build_get_service(project: &str, service: &str) -> HttpRequest {
    bodyless(HttpMethod::Get, item_path(project, service))
}

pub fn build_update_service(
    project: &str,
    service: &str,
    input: &UpdateServiceRequest,
) -> Result<HttpRequest, ApiError> {
    with_json(HttpMethod::Put, item_path(project, service), input)
}

pub fn build_delete_service(project: &str, service: &str) -> HttpRequest {
    bodyless(HttpMethod::Delete, item_path(project, service))
}

pub fn build_list_services(project: &str) -> HttpRequest {
    bodyless(HttpMethod::Get, collection_path(project))
}

/// Parse a response carrying a single `service`. An error-free envelope
/// without one is `Ok(None)`.
pub fn parse_service(body: &[u8]) -> Result<Option<Service>, ApiError> {
    Ok(decode::<ServicePayload>(body)?.service)
}

/// Parse a response carrying a `services` list. A missing list is empty.
pub fn parse_service_list(body: &[u8]) -> Result<Vec<Service>, ApiError> {
    Ok(decode::<ServiceListPayload>(body)?.services)
}

/// Parse a delete acknowledgement. Only the `errors` list matters.
pub fn parse_delete(body: &[u8]) -> Result<(), ApiError> {
    decode::<NoPayload>(body).map(|_| ())
}

/// CRUD operations on the services of a project.
///
/// Holds nothing but the transport, so it is as thread-safe as `T` is.
#[derive(Debug, Clone)]
pub struct ServicesHandler<T> {
    transport: T,
}

impl<T: Transport> ServicesHandler<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn create(
        &self,
        project: &str,
        input: &CreateServiceRequest,
    ) -> Result<Option<Service>, ApiError> {
        let body = self.send(build_create_service(project, input)?)?;
        parse_service(&body)
    }

    pub fn get(&self, project: &str, service: &str) -> Result<Option<Service>, ApiError> {
        let body = self.send(build_get_service(project, service))?;
        parse_service(&body)
    }

    /// See `UpdateServiceRequest` for how `powered` is always applied.
    pub fn update(
        &self,
        project: &str,
        service: &str,
        input: &UpdateServiceRequest,
    ) -> Result<Option<Service>, ApiError> {
        let body = self.send(build_update_service(project, service, input)?)?;
        parse_service(&body)
    }

    pub fn delete(&self, project: &str, service: &str) -> Result<(), ApiError> {
        let body = self.send(build_delete_service(project, service))?;
        parse_delete(&body)
    }

    pub fn list(&self, project: &str) -> Result<Vec<Service>, ApiError> {
        let body = self.send(build_list_services(project))?;
        parse_service_list(&body)
    }

    fn send(&self, request: HttpRequest) -> Result<Vec<u8>, ApiError> {
        debug!(method = %request.method, path = %request.path, "sending request");
        self.transport.execute(request).map_err(ApiError::Transport)
    }
}
