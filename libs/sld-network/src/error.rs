//! Error types for sld-network

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Network {0} not found in store")]
    NetworkNotFound(Uuid),

    #[error("Network store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network store returned HTTP {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Invalid network document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Failures of the store itself rather than of the requested document
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Http(_) | StoreError::UnexpectedStatus { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
