//! Application state shared by all API handlers

use crate::config::{NetworkStoreKind, SldsrvConfig};
use crate::error::{Result, SldSrvError};
use crate::producer::{DiagramConfig, DiagramProducer};
use crate::resolver::NetworkResolver;
use crate::service::SingleLineDiagramService;
use chrono::{DateTime, Utc};
use sld_network::{MemoryNetworkStore, NetworkStore, RestNetworkStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct AppState {
    pub service: SingleLineDiagramService,
    pub config: Arc<SldsrvConfig>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: SingleLineDiagramService, config: Arc<SldsrvConfig>) -> Self {
        Self {
            service,
            config,
            started_at: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }

    pub fn store_kind(&self) -> &'static str {
        self.service.resolver().store_kind()
    }
}

/// Build the network store selected by `network_store.kind`
pub async fn create_network_store(config: &SldsrvConfig) -> Result<Arc<dyn NetworkStore>> {
    let settings = &config.network_store;
    let store: Arc<dyn NetworkStore> = match settings.kind {
        NetworkStoreKind::Rest => {
            info!("Using REST network store at {}", settings.base_url);
            let store = RestNetworkStore::new(
                settings.base_url.clone(),
                Duration::from_millis(settings.timeout_ms),
            )
            .map_err(SldSrvError::Store)?;
            Arc::new(store)
        },
        NetworkStoreKind::Directory => {
            info!("Using directory network store at {}", settings.directory.display());
            let store = MemoryNetworkStore::from_directory(&settings.directory)
                .await
                .map_err(SldSrvError::Store)?;
            Arc::new(store)
        },
    };
    Ok(store)
}

/// Assemble the service around an existing store
pub fn create_app_state_with_store(
    config: SldsrvConfig,
    store: Arc<dyn NetworkStore>,
) -> Result<Arc<AppState>> {
    let diagram_config = Arc::new(DiagramConfig::from_settings(&config.diagram)?);
    info!(
        "Diagram component library: {}",
        diagram_config.component_library.name()
    );

    let service = SingleLineDiagramService::new(
        NetworkResolver::new(store),
        DiagramProducer::new(diagram_config),
    );
    Ok(Arc::new(AppState::new(service, Arc::new(config))))
}

pub async fn create_app_state(config: SldsrvConfig) -> Result<Arc<AppState>> {
    let store = create_network_store(&config).await?;
    create_app_state_with_store(config, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sld_network::fixtures::{sample_network, SAMPLE_NETWORK_ID};

    #[tokio::test]
    async fn test_directory_store_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("{}.json", SAMPLE_NETWORK_ID));
        std::fs::write(&path, serde_json::to_vec(&sample_network()).unwrap()).unwrap();

        let mut config = SldsrvConfig::default();
        config.network_store.kind = NetworkStoreKind::Directory;
        config.network_store.directory = dir.path().to_path_buf();

        let state = create_app_state(config).await.unwrap();
        assert_eq!(state.store_kind(), "memory");
        let diagram = state
            .service
            .generate_svg_and_metadata(SAMPLE_NETWORK_ID, "VL1", true)
            .await
            .unwrap();
        assert!(diagram.svg.contains("Voltage level 1"));
    }

    #[tokio::test]
    async fn test_rest_store_state() {
        let state = create_app_state(SldsrvConfig::default()).await.unwrap();
        assert_eq!(state.store_kind(), "rest");
    }

    #[tokio::test]
    async fn test_missing_directory_fails() {
        let mut config = SldsrvConfig::default();
        config.network_store.kind = NetworkStoreKind::Directory;
        config.network_store.directory = "/nonexistent/networks".into();
        assert!(matches!(
            create_app_state(config).await,
            Err(SldSrvError::Store(_))
        ));
    }
}
