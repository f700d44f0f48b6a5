//! Remote network store client
//!
//! Fetches network documents from `GET {base_url}/v1/networks/{uuid}`.

use crate::error::{Result, StoreError};
use crate::model::Network;
use crate::traits::NetworkStore;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// HTTP client for a remote network store
#[derive(Clone)]
pub struct RestNetworkStore {
    base_url: String,
    client: Client,
}

impl RestNetworkStore {
    /// Create a client with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Reuse an existing reqwest client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn network_url(&self, id: Uuid) -> String {
        format!("{}/v1/networks/{}", self.base_url, id)
    }
}

#[async_trait]
impl NetworkStore for RestNetworkStore {
    async fn get_network(&self, id: Uuid) -> Result<Arc<Network>> {
        let url = self.network_url(id);
        debug!("Fetching network from {}", url);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(StoreError::NetworkNotFound(id)),
            status if !status.is_success() => {
                return Err(StoreError::UnexpectedStatus {
                    status: status.as_u16(),
                    url,
                });
            },
            _ => {},
        }

        let body = response.bytes().await?;
        let network: Network = serde_json::from_slice(&body)?;
        Ok(Arc::new(network))
    }

    fn kind(&self) -> &'static str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_url_trims_trailing_slash() {
        let store = RestNetworkStore::new("http://store:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(store.base_url(), "http://store:8080");
        assert_eq!(
            store.network_url(Uuid::nil()),
            "http://store:8080/v1/networks/00000000-0000-0000-0000-000000000000"
        );
    }
}
