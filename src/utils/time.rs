//! Timestamp helpers

use chrono::{SecondsFormat, Utc};

/// Current UTC time as ISO-8601 with millisecond precision (`2024-01-01T00:00:00.000Z`)
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current UTC time in a form safe for file names (`20240101T000000.000Z`)
pub fn file_timestamp() -> String {
    Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string()
}
