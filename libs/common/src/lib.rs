//! Shared runtime plumbing for the single-line diagram services
//!
//! Provides the pieces every service binary needs, including:
//! - logging (console, daily-rolling files, API access log)
//! - layered configuration loading
//! - API response envelopes and HTTP error mapping
//! - startup banner and shutdown signal handling

pub mod api_types;
pub mod config_loader;
pub mod logging;
pub mod service_bootstrap;
pub mod shutdown;

// Re-export commonly used API types
pub use api_types::{ErrorInfo, ErrorResponse, SuccessResponse};

// Re-export AppError when axum feature is enabled
#[cfg(feature = "axum")]
pub use api_types::AppError;

pub use config_loader::{load_layered, ConfigLoadError};
pub use logging::LogConfig;
pub use service_bootstrap::{LoggingSettings, ServiceInfo};

// Re-export common dependencies
pub use anyhow;
pub use serde;
pub use serde_json;
pub use tokio;
