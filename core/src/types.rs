//! Domain DTOs for the service API.
//!
//! # Design
//! `Service` is a snapshot: every call returns a fresh one and nothing here
//! mutates it. All wire fields are optional, and a missing field and an
//! explicit `null` decode the same way: `""`, `0` or an empty vector. Callers
//! never have to tell "absent" from "empty".

use serde::{Deserialize, Serialize};

use crate::envelope::null_as_default;
use crate::error::UriError;
use crate::uri::host_port;

/// A provisioned service instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    #[serde(deserialize_with = "null_as_default")]
    pub cloud_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub create_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub update_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub group_list: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub node_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub plan: String,
    #[serde(rename = "service_name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub service_type: String,
    #[serde(rename = "service_uri", deserialize_with = "null_as_default")]
    pub uri: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    /// Free-form, service-type specific. No schema is assumed.
    pub metadata: serde_json::Value,
    #[serde(deserialize_with = "null_as_default")]
    pub users: Vec<ServiceUser>,
}

impl Service {
    /// Host part of the connection URI.
    pub fn hostname(&self) -> Result<String, UriError> {
        host_port(&self.uri).map(|(host, _)| host)
    }

    /// Port part of the connection URI, as written.
    pub fn port(&self) -> Result<String, UriError> {
        host_port(&self.uri).map(|(_, port)| port)
    }
}

/// A login provisioned on a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceUser {
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub password: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub user_type: String,
}

/// Request payload for creating a service. Unset optional fields are left
/// out of the JSON so the server picks its own defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    pub service_name: String,
    pub service_type: String,
}

/// Request payload for updating a service.
///
/// `powered` is always sent. Leaving it at its default of `false` powers
/// the service off, so an update meant only to change the plan must set
/// `powered: true` to keep a running service running.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default)]
    pub powered: bool,
}
