//! Health check

use axum::{extract::State, response::Json};
use chrono::Utc;
use common::SuccessResponse;
use serde_json::json;
use std::sync::Arc;

use crate::app::AppState;

/// Service health with the active network store backend
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value,
            example = json!({
                "success": true,
                "data": {
                    "status": "healthy",
                    "service": "sldsrv",
                    "version": "0.1.0",
                    "network_store": "rest",
                    "uptime_seconds": 3600,
                    "timestamp": "2025-10-15T10:30:00+00:00"
                }
            })
        )
    ),
    tag = "sldsrv"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Json<SuccessResponse<serde_json::Value>> {
    Json(SuccessResponse::new(json!({
        "status": "healthy",
        "service": state.config.service.name,
        "version": env!("CARGO_PKG_VERSION"),
        "network_store": state.store_kind(),
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    })))
}
