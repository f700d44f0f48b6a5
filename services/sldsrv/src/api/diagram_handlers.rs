//! Diagram endpoints
//!
//! All three share the `/{networkUuid}/{voltageLevelId}` path and the
//! `useName` query flag. A malformed UUID is rejected by the path extractor
//! with 400 before any lookup.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::SldSrvError;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DiagramQuery {
    /// Label equipment by name instead of id (default: false)
    #[serde(default)]
    pub use_name: bool,
}

/// SVG drawing of a voltage level
#[utoipa::path(
    get,
    path = "/v1/svg/{networkUuid}/{voltageLevelId}",
    params(
        ("networkUuid" = Uuid, Path, description = "Network UUID"),
        ("voltageLevelId" = String, Path, description = "Voltage level ID"),
        DiagramQuery
    ),
    responses(
        (status = 200, description = "SVG diagram", content_type = "image/svg+xml", body = String),
        (status = 400, description = "Malformed network UUID"),
        (status = 404, description = "Network or voltage level not found", body = common::ErrorResponse),
        (status = 502, description = "Network store failure", body = common::ErrorResponse)
    ),
    tag = "diagrams"
)]
pub async fn get_svg(
    State(state): State<Arc<AppState>>,
    Path((network_uuid, voltage_level_id)): Path<(Uuid, String)>,
    Query(query): Query<DiagramQuery>,
) -> Result<Response, SldSrvError> {
    let diagram = state
        .service
        .generate_svg_and_metadata(network_uuid, &voltage_level_id, query.use_name)
        .await?;
    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], diagram.svg).into_response())
}

/// JSON metadata of a voltage level diagram
#[utoipa::path(
    get,
    path = "/v1/metadata/{networkUuid}/{voltageLevelId}",
    params(
        ("networkUuid" = Uuid, Path, description = "Network UUID"),
        ("voltageLevelId" = String, Path, description = "Voltage level ID"),
        DiagramQuery
    ),
    responses(
        (status = 200, description = "Diagram metadata", body = serde_json::Value,
            example = json!({
                "nodes": [{"id": "BBS1", "vId": "VL1", "equipmentId": "BBS1", "componentType": "BUSBAR_SECTION", "open": false}],
                "wires": [],
                "feederInfos": [],
                "components": [],
                "layoutParameters": {"scaleFactor": 1.0}
            })
        ),
        (status = 400, description = "Malformed network UUID"),
        (status = 404, description = "Network or voltage level not found", body = common::ErrorResponse),
        (status = 502, description = "Network store failure", body = common::ErrorResponse)
    ),
    tag = "diagrams"
)]
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
    Path((network_uuid, voltage_level_id)): Path<(Uuid, String)>,
    Query(query): Query<DiagramQuery>,
) -> Result<Response, SldSrvError> {
    let diagram = state
        .service
        .generate_svg_and_metadata(network_uuid, &voltage_level_id, query.use_name)
        .await?;
    Ok(([(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], diagram.metadata).into_response())
}

/// Zip archive holding `{voltageLevelId}.svg` and `{voltageLevelId}.json`
#[utoipa::path(
    get,
    path = "/v1/svg-and-metadata/{networkUuid}/{voltageLevelId}",
    params(
        ("networkUuid" = Uuid, Path, description = "Network UUID"),
        ("voltageLevelId" = String, Path, description = "Voltage level ID"),
        DiagramQuery
    ),
    responses(
        (status = 200, description = "Zip archive", content_type = "application/zip", body = Vec<u8>),
        (status = 400, description = "Malformed network UUID"),
        (status = 404, description = "Network or voltage level not found", body = common::ErrorResponse),
        (status = 502, description = "Network store failure", body = common::ErrorResponse)
    ),
    tag = "diagrams"
)]
pub async fn get_svg_and_metadata(
    State(state): State<Arc<AppState>>,
    Path((network_uuid, voltage_level_id)): Path<(Uuid, String)>,
    Query(query): Query<DiagramQuery>,
) -> Result<Response, SldSrvError> {
    let archive = state
        .service
        .generate_svg_and_metadata_zip(network_uuid, &voltage_level_id, query.use_name)
        .await?;
    let disposition = attachment_disposition(&format!("{}.zip", voltage_level_id));
    Ok((
        [
            (header::CONTENT_TYPE, ZIP_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        archive,
    )
        .into_response())
}

/// `Content-Disposition` for a download named after a voltage level id
///
/// The quoted `filename` keeps printable ASCII only, with `"` and `\`
/// replaced by `_`. When that loses anything, the exact name follows as an
/// RFC 5987 `filename*`.
pub fn attachment_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect();

    if fallback == file_name {
        return format!("attachment; filename=\"{}\"", fallback);
    }

    let mut encoded = String::with_capacity(file_name.len() * 3);
    for byte in file_name.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_disposition() {
        assert_eq!(
            attachment_disposition("VL1.zip"),
            r#"attachment; filename="VL1.zip""#
        );
    }

    #[test]
    fn test_quotes_and_non_ascii_are_encoded() {
        assert_eq!(
            attachment_disposition(r#"VL "Nord"\é.zip"#),
            r#"attachment; filename="VL _Nord___.zip"; filename*=UTF-8''VL%20%22Nord%22%5C%C3%A9.zip"#
        );
    }

    #[test]
    fn test_disposition_is_a_valid_header() {
        let value = attachment_disposition("Poste \"Est\"\r\n.zip");
        assert!(axum::http::HeaderValue::from_str(&value).is_ok());
        assert!(!value.contains('\r'));
    }
}
