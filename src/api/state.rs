//! Shared application state for request handlers

use std::sync::Arc;

use crate::event_store::EventStore;

/// State handed to every axum handler
pub struct AppState {
    /// The record store, constructed once at startup
    pub store: Arc<EventStore>,

    /// Name reported by the health endpoint
    pub server_name: String,
}

impl AppState {
    pub fn new(store: Arc<EventStore>, server_name: impl Into<String>) -> Self {
        Self {
            store,
            server_name: server_name.into(),
        }
    }
}
