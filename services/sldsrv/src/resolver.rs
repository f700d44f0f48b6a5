//! Network lookup by UUID

use crate::error::{Result, SldSrvError};
use sld_network::{Network, NetworkStore, StoreError};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Only a missing network is rewritten; every other store failure is kept.
pub fn map_store_error(err: StoreError) -> SldSrvError {
    match err {
        StoreError::NetworkNotFound(id) => SldSrvError::NetworkNotFound(id),
        other => SldSrvError::Store(other),
    }
}

#[derive(Clone)]
pub struct NetworkResolver {
    store: Arc<dyn NetworkStore>,
}

impl NetworkResolver {
    pub fn new(store: Arc<dyn NetworkStore>) -> Self {
        Self { store }
    }

    pub fn store_kind(&self) -> &'static str {
        self.store.kind()
    }

    pub async fn resolve(&self, network_uuid: Uuid) -> Result<Arc<Network>> {
        debug!("Resolving network {} from {} store", network_uuid, self.store.kind());
        self.store
            .get_network(network_uuid)
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::{ErrorCategory, ServiceErrorTrait};
    use sld_network::fixtures::{sample_network, SAMPLE_NETWORK_ID};
    use sld_network::MemoryNetworkStore;
    use std::path::PathBuf;

    fn resolver() -> NetworkResolver {
        let store = MemoryNetworkStore::new();
        store.insert(SAMPLE_NETWORK_ID, sample_network());
        NetworkResolver::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_resolve_known_network() {
        let network = resolver().resolve(SAMPLE_NETWORK_ID).await.unwrap();
        assert!(network.voltage_level("VL1").is_some());
    }

    #[tokio::test]
    async fn test_resolve_unknown_network() {
        let id = Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap();
        let err = resolver().resolve(id).await.unwrap_err();
        assert!(matches!(err, SldSrvError::NetworkNotFound(missing) if missing == id));
        assert_eq!(
            err.to_string(),
            "Network '11111111-1111-1111-1111-111111111111' not found"
        );
    }

    #[test]
    fn test_map_store_error_keeps_other_failures() {
        let err = map_store_error(StoreError::UnexpectedStatus {
            status: 503,
            url: "http://store/v1/networks/1".to_string(),
        });
        assert!(matches!(
            err,
            SldSrvError::Store(StoreError::UnexpectedStatus { status: 503, .. })
        ));

        let err = map_store_error(StoreError::Io {
            path: PathBuf::from("/data/networks/x.json"),
            source: std::io::Error::other("denied"),
        });
        assert!(matches!(err, SldSrvError::Store(StoreError::Io { .. })));
        assert_eq!(err.category(), ErrorCategory::Internal);

        let id = Uuid::nil();
        assert!(matches!(
            map_store_error(StoreError::NetworkNotFound(id)),
            SldSrvError::NetworkNotFound(missing) if missing == id
        ));
    }
}
