use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use vivah_shared::clients::db;
use vivah_shared::types::api::{HealthResponse, HealthStatus};

use crate::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let health = HealthResponse::from_database_probe("vivah-user", env!("CARGO_PKG_VERSION"), db::ping(&state.db));
    let status = if health.status == HealthStatus::Healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health))
}
