//! MDB Ingest Server
//!
//! A small HTTP ingestion endpoint that accepts JSON event payloads,
//! appends them to one durable collection on disk, and exposes read,
//! export and clear operations over it.
//!
//! # Modules
//!
//! - `types`: Record and Collection
//! - `event_store`: Whole-file, lock-serialized record persistence
//! - `api`: Axum routes, envelopes and error mapping
//! - `config`: Environment-driven server configuration
//! - `utils`: Atomic file writes and timestamps
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mdb_ingest::{create_router, AppState, EventStore, EventStoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let store = Arc::new(EventStore::open(EventStoreConfig::new("data"))?);
//!     let app = create_router(Arc::new(AppState::new(store, "mdb")), None);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod event_store;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use api::{create_router, AppState, GatewayError};
pub use config::{ConfigError, ServerConfig};
pub use event_store::{EventStore, EventStoreConfig, EventStoreError, EventStoreResult};
pub use types::{Collection, Record, RecordKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
