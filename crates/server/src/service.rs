//! Service endpoints outside `/api`.

use api_types::service::{Health, ServiceInfo};
use axum::{Json, extract::State, http::StatusCode};

use crate::server::ServerState;

const ENDPOINTS: [&str; 8] = [
    "/health",
    "/api/budget",
    "/api/todos",
    "/api/recipe",
    "/api/cooking-session",
    "/api/notifications",
    "/api/notification-data",
    "/api/event-data",
];

pub async fn health(State(state): State<ServerState>) -> (StatusCode, Json<Health>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Health {
                status: "ok".to_string(),
                message: "Server is running".to_string(),
            }),
        ),
        Err(err) => {
            tracing::error!("database ping failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Health {
                    status: "error".to_string(),
                    message: "Database is unreachable".to_string(),
                }),
            )
        }
    }
}

pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "Personal Dashboard API Server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ENDPOINTS.iter().map(ToString::to_string).collect(),
    })
}
