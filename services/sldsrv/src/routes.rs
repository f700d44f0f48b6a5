//! API Route Configuration

use axum::{routing::get, Router};
use std::sync::Arc;

#[cfg(feature = "swagger-ui")]
use utoipa::OpenApi;

use crate::api::admin_handlers::{get_log_level, set_log_level};
use crate::api::diagram_handlers::{get_metadata, get_svg, get_svg_and_metadata};
use crate::api::health_handlers::health_check;
use crate::app::AppState;

// OpenAPI documentation - only compiled when swagger-ui feature is enabled
#[cfg(feature = "swagger-ui")]
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health_handlers::health_check,
        crate::api::diagram_handlers::get_svg,
        crate::api::diagram_handlers::get_metadata,
        crate::api::diagram_handlers::get_svg_and_metadata,
        crate::api::admin_handlers::get_log_level,
        crate::api::admin_handlers::set_log_level
    ),
    components(schemas(
        common::ErrorResponse,
        common::ErrorInfo,
        crate::api::admin_handlers::LogLevelResponse,
        crate::api::admin_handlers::SetLogLevelRequest
    )),
    tags(
        (name = "sldsrv", description = "Single-line diagram service"),
        (name = "diagrams", description = "Voltage level diagrams and metadata"),
        (name = "admin", description = "Runtime administration")
    )
)]
pub struct SldsrvApiDoc;

/// Create all API routes for the diagram service
pub fn create_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/svg/{networkUuid}/{voltageLevelId}", get(get_svg))
        .route("/v1/metadata/{networkUuid}/{voltageLevelId}", get(get_metadata))
        .route(
            "/v1/svg-and-metadata/{networkUuid}/{voltageLevelId}",
            get(get_svg_and_metadata),
        )
        .route("/api/admin/logs/level", get(get_log_level).post(set_log_level))
        // Apply HTTP request logging middleware
        .layer(axum::middleware::from_fn(common::logging::http_request_logger))
        .with_state(state)
}
