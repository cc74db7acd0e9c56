use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const DEFAULT_CLOUD: &str = "mock-cloud-1";
pub const DEFAULT_PLAN: &str = "hobbyist";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceUser {
    pub username: String,
    pub password: String,
    #[serde(rename = "type")]
    pub user_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Service {
    pub cloud_name: String,
    pub create_time: String,
    pub update_time: String,
    pub group_list: Vec<String>,
    pub node_count: u32,
    pub plan: String,
    pub service_name: String,
    pub service_type: String,
    pub service_uri: String,
    pub state: String,
    pub metadata: serde_json::Value,
    pub users: Vec<ServiceUser>,
}

#[derive(Deserialize)]
pub struct CreateService {
    pub cloud: Option<String>,
    pub group_name: Option<String>,
    pub plan: Option<String>,
    pub service_name: String,
    pub service_type: String,
}

#[derive(Deserialize)]
pub struct UpdateService {
    pub cloud: Option<String>,
    pub group_name: Option<String>,
    pub plan: Option<String>,
    #[serde(default)]
    pub powered: bool,
}

#[derive(Serialize)]
struct ServiceEnvelope {
    service: Service,
}

#[derive(Serialize)]
struct ServiceListEnvelope {
    services: Vec<Service>,
}

#[derive(Serialize)]
struct MessageEnvelope {
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorEntry {
    status: u16,
    message: String,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    errors: Vec<ErrorEntry>,
    message: String,
}

/// An error rendered as an envelope with a single `errors` entry.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Service not found")
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            errors: vec![ErrorEntry {
                status: self.status.as_u16(),
                message: self.message.clone(),
            }],
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Services keyed by `(project, service_name)`.
pub type Db = Arc<RwLock<HashMap<(String, String), Service>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/project/{project}/service", get(list_services).post(create_service))
        .route(
            "/project/{project}/service/{service}",
            get(get_service).put(update_service).delete(delete_service),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Well-known port for a service type; anything else is served over 443.
pub fn default_port(service_type: &str) -> u16 {
    match service_type {
        "pg" => 5432,
        "mysql" => 3306,
        "redis" => 6379,
        "kafka" => 9092,
        "opensearch" => 9200,
        "cassandra" => 9042,
        _ => 443,
    }
}

async fn list_services(
    State(db): State<Db>,
    Path(project): Path<String>,
) -> Json<ServiceListEnvelope> {
    let services = db.read().await;
    let mut listed: Vec<Service> = services
        .iter()
        .filter(|((p, _), _)| *p == project)
        .map(|(_, s)| s.clone())
        .collect();
    listed.sort_by(|a, b| a.service_name.cmp(&b.service_name));
    Json(ServiceListEnvelope { services: listed })
}

async fn create_service(
    State(db): State<Db>,
    Path(project): Path<String>,
    input: Result<Json<CreateService>, JsonRejection>,
) -> Result<(StatusCode, Json<ServiceEnvelope>), ApiFailure> {
    let Json(input) = input.map_err(|e| ApiFailure::new(StatusCode::BAD_REQUEST, e.body_text()))?;
    if input.service_name.is_empty() || input.service_type.is_empty() {
        return Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            "service_name and service_type are required",
        ));
    }

    let mut services = db.write().await;
    let key = (project.clone(), input.service_name.clone());
    if services.contains_key(&key) {
        return Err(ApiFailure::new(
            StatusCode::CONFLICT,
            "Service name is already in use in this project",
        ));
    }

    let created = now();
    let service = Service {
        cloud_name: input.cloud.unwrap_or_else(|| DEFAULT_CLOUD.to_string()),
        create_time: created.clone(),
        update_time: created,
        group_list: vec![input.group_name.unwrap_or_else(|| "default".to_string())],
        node_count: 1,
        plan: input.plan.unwrap_or_else(|| DEFAULT_PLAN.to_string()),
        service_uri: format!(
            "{}://{}-{}.mock.local:{}",
            input.service_type,
            input.service_name,
            project,
            default_port(&input.service_type)
        ),
        service_name: input.service_name,
        service_type: input.service_type,
        state: "RUNNING".to_string(),
        metadata: serde_json::json!({}),
        users: vec![ServiceUser {
            username: "avnadmin".to_string(),
            password: Uuid::new_v4().simple().to_string(),
            user_type: "primary".to_string(),
        }],
    };
    info!(%project, service = %service.service_name, "service created");
    services.insert(key, service.clone());
    Ok((StatusCode::CREATED, Json(ServiceEnvelope { service })))
}

async fn get_service(
    State(db): State<Db>,
    Path((project, service)): Path<(String, String)>,
) -> Result<Json<ServiceEnvelope>, ApiFailure> {
    let services = db.read().await;
    services
        .get(&(project, service))
        .cloned()
        .map(|service| Json(ServiceEnvelope { service }))
        .ok_or_else(ApiFailure::not_found)
}

async fn update_service(
    State(db): State<Db>,
    Path((project, name)): Path<(String, String)>,
    input: Result<Json<UpdateService>, JsonRejection>,
) -> Result<Json<ServiceEnvelope>, ApiFailure> {
    let Json(input) = input.map_err(|e| ApiFailure::new(StatusCode::BAD_REQUEST, e.body_text()))?;
    let mut services = db.write().await;
    let service = services
        .get_mut(&(project.clone(), name.clone()))
        .ok_or_else(ApiFailure::not_found)?;
    if let Some(cloud) = input.cloud {
        service.cloud_name = cloud;
    }
    if let Some(group) = input.group_name {
        service.group_list = vec![group];
    }
    if let Some(plan) = input.plan {
        service.plan = plan;
    }
    service.state = if input.powered { "RUNNING" } else { "POWEROFF" }.to_string();
    service.update_time = now();
    info!(%project, service = %name, state = %service.state, "service updated");
    Ok(Json(ServiceEnvelope {
        service: service.clone(),
    }))
}

async fn delete_service(
    State(db): State<Db>,
    Path((project, name)): Path<(String, String)>,
) -> Result<Json<MessageEnvelope>, ApiFailure> {
    let mut services = db.write().await;
    services
        .remove(&(project.clone(), name.clone()))
        .ok_or_else(ApiFailure::not_found)?;
    info!(%project, service = %name, "service deleted");
    Ok(Json(MessageEnvelope { message: "deleted" }))
}
