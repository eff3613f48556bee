//! Data types for the MDB ingestion server

mod record;

pub use record::{is_truthy, Record, RecordKind};

/// The full ordered set of records, the unit of persistence
pub type Collection = Vec<Record>;
