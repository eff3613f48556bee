//! Event Store Module
//!
//! Whole-file persistence for the record collection:
//!
//! ```text
//! Append:
//! ┌─────────┐    ┌──────────┐    ┌───────────┐    ┌──────────────────┐
//! │ Gateway │───►│ lock     │───►│ read file │───►│ push + write tmp │──► rename
//! └─────────┘    └──────────┘    └───────────┘    └──────────────────┘
//! ```
//!
//! Reads take the same lock, so no caller ever sees a half-written file.

mod store;

pub use store::{EventStore, EventStoreConfig, EventStoreError, EventStoreResult};
