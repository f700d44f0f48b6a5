//! Single-line diagram service
//!
//! Resolves a network by UUID, renders one of its voltage levels through the
//! `sld-diagram` library and serves the SVG, the JSON metadata, or both in a
//! zip archive.

pub mod api;
pub mod app;
pub mod archive;
pub mod config;
pub mod error;
pub mod producer;
pub mod resolver;
pub mod routes;
pub mod service;

pub use app::{create_app_state, create_app_state_with_store, AppState};
pub use config::SldsrvConfig;
pub use error::{Result, SldSrvError};
pub use producer::{DiagramConfig, DiagramProducer, SvgAndMetadata};
pub use resolver::{map_store_error, NetworkResolver};
pub use routes::create_routes;
pub use service::SingleLineDiagramService;
