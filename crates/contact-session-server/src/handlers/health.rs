use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::storage::FileSessionStore;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

pub async fn readiness_check(State(store): State<Arc<FileSessionStore>>) -> StatusCode {
    if store.is_available().await {
        StatusCode::OK
    } else {
        tracing::warn!("Sessions directory {} unavailable", store.base_dir().display());
        StatusCode::SERVICE_UNAVAILABLE
    }
}
