//! Runtime log level administration
//!
//! Same contract as the other services: `GET` reads the active filter,
//! `POST {"level": "..."}` swaps it through the reloadable filter layer.

use axum::{http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogLevelResponse {
    /// Active filter, a level (`debug`) or a full directive list
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetLogLevelRequest {
    pub level: String,
}

/// Current log filter
#[utoipa::path(
    get,
    path = "/api/admin/logs/level",
    responses(
        (status = 200, description = "Active log filter", body = LogLevelResponse,
            example = json!({"level": "info,sldsrv=debug,api_access=info"})
        )
    ),
    tag = "admin"
)]
pub async fn get_log_level() -> Json<LogLevelResponse> {
    Json(LogLevelResponse {
        level: common::logging::get_log_level(),
        status: None,
        error: None,
    })
}

/// Replace the log filter without restarting the service
#[utoipa::path(
    post,
    path = "/api/admin/logs/level",
    request_body = SetLogLevelRequest,
    responses(
        (status = 200, description = "Filter applied", body = LogLevelResponse,
            example = json!({"level": "debug", "status": "ok"})
        ),
        (status = 400, description = "Invalid filter or logging without reload support", body = LogLevelResponse,
            example = json!({"level": "info", "status": "error", "error": "Invalid log level 'sldsrv=loud': ..."})
        )
    ),
    tag = "admin"
)]
pub async fn set_log_level(
    Json(request): Json<SetLogLevelRequest>,
) -> (StatusCode, Json<LogLevelResponse>) {
    match common::logging::set_log_level(request.level.trim()) {
        Ok(()) => (
            StatusCode::OK,
            Json(LogLevelResponse {
                level: common::logging::get_log_level(),
                status: Some("ok".to_string()),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!("Log level change rejected: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(LogLevelResponse {
                    level: common::logging::get_log_level(),
                    status: Some("error".to_string()),
                    error: Some(e),
                }),
            )
        },
    }
}
