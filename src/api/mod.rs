//! API module for HTTP endpoints
//!
//! The ingestion gateway: routes, response envelopes and error mapping.

pub mod http;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use rest::GatewayError;
pub use state::AppState;
