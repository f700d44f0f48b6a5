//! Trait definitions for network store abstraction

use crate::error::Result;
use crate::model::Network;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Read access to persisted network models
///
/// Implementations:
/// - `MemoryNetworkStore`: in-memory map, optionally filled from a directory
/// - `RestNetworkStore`: remote network store over HTTP
#[async_trait]
pub trait NetworkStore: Send + Sync + 'static {
    /// Load the network identified by `id`
    ///
    /// Returns `StoreError::NetworkNotFound` when the store has no such network.
    async fn get_network(&self, id: Uuid) -> Result<Arc<Network>>;

    /// Short backend label for health reporting
    fn kind(&self) -> &'static str;
}
