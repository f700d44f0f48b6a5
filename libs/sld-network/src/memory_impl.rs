//! In-memory network store
//!
//! Uses DashMap for lock-free concurrent reads. Filled programmatically or
//! from a directory of `<uuid>.json` network documents.

use crate::error::{Result, StoreError};
use crate::model::Network;
use crate::traits::NetworkStore;
use async_trait::async_trait;
use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// In-memory network store
pub struct MemoryNetworkStore {
    networks: Arc<DashMap<Uuid, Arc<Network>>>,
}

impl MemoryNetworkStore {
    pub fn new() -> Self {
        Self {
            networks: Arc::new(DashMap::new()),
        }
    }

    /// Insert or replace a network, returning the previous one
    pub fn insert(&self, id: Uuid, network: Network) -> Option<Arc<Network>> {
        self.networks.insert(id, Arc::new(network))
    }

    pub fn remove(&self, id: &Uuid) -> Option<Arc<Network>> {
        self.networks.remove(id).map(|(_, network)| network)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Load every `<uuid>.json` file of `dir`
    ///
    /// Files whose stem is not a UUID are skipped. A document that fails to
    /// parse aborts the load. Returns the number of networks loaded.
    pub async fn load_directory(&self, dir: &Path) -> Result<usize> {
        let io_err = |source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
        let mut loaded = 0;

        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| Uuid::parse_str(stem).ok())
            else {
                warn!("Skipping {}: file name is not a network UUID", path.display());
                continue;
            };

            let bytes = tokio::fs::read(&path).await.map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            let network: Network = serde_json::from_slice(&bytes)?;
            debug!("Loaded network {} ({}) from {}", id, network.id, path.display());

            self.insert(id, network);
            loaded += 1;
        }

        info!("Loaded {} network(s) from {}", loaded, dir.display());
        Ok(loaded)
    }

    /// Create a store pre-filled from a directory
    pub async fn from_directory(dir: &Path) -> Result<Self> {
        let store = Self::new();
        store.load_directory(dir).await?;
        Ok(store)
    }
}

impl Default for MemoryNetworkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkStore for MemoryNetworkStore {
    async fn get_network(&self, id: Uuid) -> Result<Arc<Network>> {
        self.networks
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(StoreError::NetworkNotFound(id))
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(id: &str) -> Network {
        Network {
            id: id.to_string(),
            name: None,
            substations: vec![],
        }
    }

    #[tokio::test]
    async fn test_get_inserted_network() {
        let store = MemoryNetworkStore::new();
        let id = Uuid::new_v4();
        assert!(store.insert(id, network("grid")).is_none());

        let loaded = store.get_network(id).await.unwrap();
        assert_eq!(loaded.id, "grid");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_network_is_not_found() {
        let store = MemoryNetworkStore::new();
        let id = Uuid::new_v4();
        let err = store.get_network(id).await.unwrap_err();
        assert!(matches!(err, StoreError::NetworkNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_load_directory_skips_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let id = Uuid::new_v4();
        std::fs::write(
            dir.path().join(format!("{}.json", id)),
            r#"{"id":"from-disk","substations":[]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("README.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = MemoryNetworkStore::from_directory(dir.path()).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_network(id).await.unwrap().id, "from-disk");
    }

    #[tokio::test]
    async fn test_load_directory_rejects_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(format!("{}.json", Uuid::new_v4())), "not json").unwrap();

        let err = MemoryNetworkStore::new()
            .load_directory(dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[tokio::test]
    async fn test_load_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let err = MemoryNetworkStore::new()
            .load_directory(&missing)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
