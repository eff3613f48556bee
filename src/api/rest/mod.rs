//! REST API module for HTTP endpoints
//!
//! Ingestion:
//! - `POST /automation` - Automation event, tagged `type: "automation"`
//! - `POST /account` - Account event, tagged `type: "account"`
//! - `POST /api/mdb/receive` - Legacy untyped event, requires `timestamp`
//!
//! Collection access:
//! - `GET /api/mdb/data` - Whole collection
//! - `GET /api/mdb/data/latest` - Last 10 records, most recent first
//! - `GET /api/mdb/export` - Collection as a JSON download
//! - `DELETE /api/mdb/data` - Clear the collection

pub mod data;
pub mod ingest;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::task::JoinError;

use super::state::AppState;
use crate::event_store::{EventStore, EventStoreError};
use crate::types::Collection;
use crate::utils::iso_timestamp;

/// Success envelope for the ingestion routes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    pub data_count: usize,
    pub timestamp: String,
}

impl IngestResponse {
    pub fn new(message: impl Into<String>, data_count: usize) -> Self {
        Self {
            success: true,
            message: message.into(),
            data_count,
            timestamp: iso_timestamp(),
        }
    }
}

/// Collection read response
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub count: usize,
    pub data: Collection,
}

impl From<Collection> for DataResponse {
    fn from(data: Collection) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Response for the clear route
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

/// Failures surfaced to HTTP callers
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The caller sent something unusable
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] EventStoreError),

    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Store(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JoinError> for GatewayError {
    fn from(e: JoinError) -> Self {
        GatewayError::Internal(format!("store task failed: {}", e))
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        (status, Json(ApiError { error: self.to_string() })).into_response()
    }
}

/// Run a store operation on the blocking pool
pub(crate) async fn with_store<T, F>(state: &Arc<AppState>, op: F) -> Result<T, GatewayError>
where
    F: FnOnce(&EventStore) -> Result<T, EventStoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || op(&store)).await?;
    Ok(result?)
}

/// Parse a request body that must be a JSON object.
///
/// The Content-Type header is not consulted; any body that parses as a JSON
/// object is accepted.
pub(crate) fn object_body(body: &[u8]) -> Result<Map<String, Value>, GatewayError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| GatewayError::Validation(format!("Invalid JSON body: {}", e)))?;

    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(GatewayError::Validation(format!(
            "Request body must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            GatewayError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_object_body_rejects_arrays() {
        let err = object_body(b"[1, 2]").unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_object_body_rejects_malformed_json() {
        let err = object_body(b"{not json").unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert!(err.to_string().starts_with("Invalid JSON body"));
    }

    #[test]
    fn test_object_body_keeps_key_order() {
        let fields = object_body(br#"{"phone":"+1555","delay":5}"#).unwrap();
        let keys: Vec<_> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["phone", "delay"]);
        assert_eq!(fields["delay"], json!(5));
    }

    #[test]
    fn test_ingest_response_is_camel_case() {
        let value = serde_json::to_value(IngestResponse::new("ok", 3)).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["dataCount"], json!(3));
        assert!(value["timestamp"].is_string());
    }
}
