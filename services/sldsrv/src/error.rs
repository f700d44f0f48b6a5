//! Error types for sldsrv

use axum::response::{IntoResponse, Response};
use common::AppError;
use errors::{ErrorCategory, ServiceErrorTrait};
use sld_diagram::GraphError;
use sld_network::StoreError;
use thiserror::Error;
use uuid::Uuid;
use zip::result::ZipError;

#[derive(Error, Debug)]
pub enum SldSrvError {
    #[error("Network '{0}' not found")]
    NetworkNotFound(Uuid),

    #[error("Voltage level {0} not found")]
    VoltageLevelNotFound(String),

    /// Store failures other than a missing network, unchanged
    #[error(transparent)]
    Store(StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] ZipError),

    #[error("Diagram graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, SldSrvError>;

impl SldSrvError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl ServiceErrorTrait for SldSrvError {
    fn error_code(&self) -> &'static str {
        match self {
            SldSrvError::NetworkNotFound(_) => "NETWORK_NOT_FOUND",
            SldSrvError::VoltageLevelNotFound(_) => "VOLTAGE_LEVEL_NOT_FOUND",
            SldSrvError::Store(_) => "NETWORK_STORE_ERROR",
            SldSrvError::Io(_) => "IO_ERROR",
            SldSrvError::Archive(_) => "ARCHIVE_ERROR",
            SldSrvError::Graph(_) => "DIAGRAM_GRAPH_ERROR",
            SldSrvError::InvalidConfig { .. } => "INVALID_CONFIG",
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            SldSrvError::NetworkNotFound(_) | SldSrvError::VoltageLevelNotFound(_) => {
                ErrorCategory::NotFound
            },
            SldSrvError::Store(StoreError::NetworkNotFound(_)) => ErrorCategory::NotFound,
            SldSrvError::Store(StoreError::Http(e)) if e.is_timeout() => ErrorCategory::Timeout,
            SldSrvError::Store(e) if e.is_transport() => ErrorCategory::Upstream,
            // Retrying cannot fix a document the store already returned
            SldSrvError::Store(StoreError::Decode(_)) => ErrorCategory::DataCorruption,
            SldSrvError::Store(_) => ErrorCategory::Internal,
            SldSrvError::Io(_) | SldSrvError::Archive(_) => ErrorCategory::Internal,
            SldSrvError::Graph(_) => ErrorCategory::Rendering,
            SldSrvError::InvalidConfig { .. } => ErrorCategory::Configuration,
        }
    }
}

impl From<SldSrvError> for AppError {
    fn from(err: SldSrvError) -> Self {
        AppError::from_service_error(&err)
    }
}

impl IntoResponse for SldSrvError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
