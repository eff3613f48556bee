//! Utility functions and helpers
//!
//! Atomic file replacement and timestamp formatting.

pub mod atomic;
pub mod time;

pub use atomic::{atomic_write, move_aside, remove_stale_temp};
pub use time::{file_timestamp, iso_timestamp};
