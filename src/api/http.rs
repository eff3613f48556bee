//! HTTP server setup with Axum

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::rest::{data, ingest};
use super::state::AppState;
use crate::utils::iso_timestamp;

/// Create the Axum router with all endpoints
///
/// When `static_dir` is given, files under it are served for any path no
/// API route claims.
pub fn create_router(state: Arc<AppState>, static_dir: Option<PathBuf>) -> Router {
    // CORS configuration - fully open
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/api/health", get(health_check))
        // Ingestion
        .route("/automation", post(ingest::receive_automation))
        .route("/account", post(ingest::receive_account))
        .route("/api/mdb/receive", post(ingest::receive_legacy))
        // Collection access
        .route("/api/mdb/data", get(data::get_data).delete(data::clear_data))
        .route("/api/mdb/data/latest", get(data::get_latest))
        .route("/api/mdb/export", get(data::export_data));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Response for GET /api/health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub server: String,
    pub timestamp: String,
}

/// Health check endpoint, touches no persisted state
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        server: state.server_name.clone(),
        timestamp: iso_timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_store::{EventStore, EventStoreConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    fn test_state(dir: &TempDir) -> Arc<AppState> {
        let store = EventStore::open(EventStoreConfig::new(dir.path().join("data"))).unwrap();
        Arc::new(AppState::new(Arc::new(store), "test-server"))
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir), None);

        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "OK");
        assert_eq!(json["server"], "test-server");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir), None);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/mdb/data")
                    .header(header::ORIGIN, "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_static_fallback() {
        let dir = TempDir::new().unwrap();
        let public = dir.path().join("public");
        fs::create_dir(&public).unwrap();
        fs::write(public.join("index.html"), "<h1>MDB</h1>").unwrap();

        let app = create_router(test_state(&dir), Some(public));

        let response = app
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<h1>MDB</h1>");
    }

    #[tokio::test]
    async fn test_unknown_route_without_static_dir() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir), None);

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
