//! RestNetworkStore against a local HTTP server

use axum::{extract::Path, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use sld_network::{Network, NetworkStore, RestNetworkStore, StoreError};
use std::time::Duration;
use uuid::Uuid;

const KNOWN: Uuid = Uuid::from_u128(1);
const BROKEN: Uuid = Uuid::from_u128(2);
const GARBLED: Uuid = Uuid::from_u128(3);

async fn get_network(Path(id): Path<Uuid>) -> impl IntoResponse {
    if id == KNOWN {
        Json(serde_json::json!({
            "id": "remote",
            "substations": [{
                "id": "S1",
                "voltageLevels": [{"id": "VL1", "nominalV": 63.0}]
            }]
        }))
        .into_response()
    } else if id == BROKEN {
        (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response()
    } else if id == GARBLED {
        (StatusCode::OK, "<html>").into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn spawn_store() -> String {
    let app = Router::new().route("/v1/networks/{id}", get(get_network));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn client() -> RestNetworkStore {
    RestNetworkStore::new(spawn_store().await, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetches_network_document() {
    let store = client().await;
    let network: std::sync::Arc<Network> = store.get_network(KNOWN).await.unwrap();
    assert_eq!(network.id, "remote");
    assert_eq!(network.voltage_level("VL1").unwrap().nominal_v, 63.0);
    assert_eq!(store.kind(), "rest");
}

#[tokio::test]
async fn test_404_maps_to_not_found() {
    let store = client().await;
    let id = Uuid::from_u128(0x1111_1111_1111_1111_1111_1111_1111_1111);
    let err = store.get_network(id).await.unwrap_err();
    assert!(matches!(err, StoreError::NetworkNotFound(missing) if missing == id));
}

#[tokio::test]
async fn test_server_error_is_unexpected_status() {
    let store = client().await;
    let err = store.get_network(BROKEN).await.unwrap_err();
    assert!(matches!(err, StoreError::UnexpectedStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_invalid_body_is_decode_error() {
    let store = client().await;
    let err = store.get_network(GARBLED).await.unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_store_is_http_error() {
    // Bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = RestNetworkStore::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let err = store.get_network(KNOWN).await.unwrap_err();
    assert!(matches!(err, StoreError::Http(_)));
}
