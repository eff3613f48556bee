//! Ingestion endpoints
//!
//! Bodies are read as raw bytes and parsed as JSON whatever the Content-Type.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use tracing::info;

use super::{object_body, with_store, GatewayError, IngestResponse};
use crate::api::state::AppState;
use crate::types::{is_truthy, Record, RecordKind};
use crate::utils::iso_timestamp;

/// POST /automation - Record an automation event
pub async fn receive_automation(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<IngestResponse>, GatewayError> {
    receive_tagged(state, body, RecordKind::Automation).await
}

/// POST /account - Record an account event
pub async fn receive_account(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<IngestResponse>, GatewayError> {
    receive_tagged(state, body, RecordKind::Account).await
}

async fn receive_tagged(
    state: Arc<AppState>,
    body: Bytes,
    kind: RecordKind,
) -> Result<Json<IngestResponse>, GatewayError> {
    let payload = object_body(&body)?;
    let record = Record::tagged(payload, kind, &iso_timestamp());

    let count = with_store(&state, move |store| store.append(record)).await?;
    info!(%kind, count, "event received");

    let message = match kind {
        RecordKind::Automation => "Automation data received successfully",
        RecordKind::Account => "Account data received successfully",
    };
    Ok(Json(IngestResponse::new(message, count)))
}

/// POST /api/mdb/receive - Legacy untyped route
///
/// The body is stored exactly as sent. Any truthy `timestamp` passes; its
/// format is not checked.
pub async fn receive_legacy(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<IngestResponse>, GatewayError> {
    let payload = object_body(&body)?;

    if !payload.get("timestamp").map(is_truthy).unwrap_or(false) {
        return Err(GatewayError::Validation(
            "Invalid data format: missing timestamp".to_string(),
        ));
    }

    let record = Record::verbatim(payload);
    let count = with_store(&state, move |store| store.append(record)).await?;
    info!(count, "legacy event received");

    Ok(Json(IngestResponse::new("Data received successfully", count)))
}
