//! 健康检查

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::web::types::{AppState, HealthResponse};

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        health: state.service.get_health(),
        providers: state.service.provider_names(),
        timestamp: chrono::Utc::now(),
    })
}
