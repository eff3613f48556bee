//! Collection read, export and clear endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::info;

use super::{with_store, ClearResponse, DataResponse, GatewayError};
use crate::api::state::AppState;

/// Size of the `/latest` slice
pub const LATEST_LIMIT: usize = 10;

/// File name offered to the browser for exports
pub const EXPORT_FILE_NAME: &str = "mdb_export.json";

/// GET /api/mdb/data - Whole collection in arrival order
pub async fn get_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DataResponse>, GatewayError> {
    let records = with_store(&state, |store| Ok(store.load())).await?;
    Ok(Json(records.into()))
}

/// GET /api/mdb/data/latest - Most recent records first
pub async fn get_latest(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DataResponse>, GatewayError> {
    let records = with_store(&state, |store| Ok(store.latest(LATEST_LIMIT))).await?;
    Ok(Json(records.into()))
}

/// GET /api/mdb/export - Collection as a downloadable JSON file
pub async fn export_data(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, GatewayError> {
    let bytes = with_store(&state, |store| store.export()).await?;

    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME);
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// DELETE /api/mdb/data - Drop every record
pub async fn clear_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearResponse>, GatewayError> {
    with_store(&state, |store| store.clear()).await?;
    info!("collection cleared via API");

    Ok(Json(ClearResponse {
        success: true,
        message: "All data cleared".to_string(),
    }))
}
