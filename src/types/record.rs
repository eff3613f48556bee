//! Record - one accepted event

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Route tag stored under the `type` key of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Automation,
    Account,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Automation => "automation",
            RecordKind::Account => "account",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single received event.
///
/// The caller's body is kept as an open key/value map (key order preserved),
/// with the gateway-added `type` and `receivedAt` fields living alongside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap a payload untouched (legacy route)
    pub fn verbatim(payload: Map<String, Value>) -> Self {
        Self(payload)
    }

    /// Tag a payload with its originating route and acceptance time.
    ///
    /// Gateway values win over caller-supplied `type` / `receivedAt` keys.
    pub fn tagged(payload: Map<String, Value>, kind: RecordKind, received_at: &str) -> Self {
        let mut fields = payload;
        fields.insert("type".to_string(), Value::String(kind.as_str().to_string()));
        fields.insert(
            "receivedAt".to_string(),
            Value::String(received_at.to_string()),
        );
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The route tag, if the record has a recognised one
    pub fn kind(&self) -> Option<RecordKind> {
        match self.0.get("type").and_then(Value::as_str) {
            Some("automation") => Some(RecordKind::Automation),
            Some("account") => Some(RecordKind::Account),
            _ => None,
        }
    }

    pub fn received_at(&self) -> Option<&str> {
        self.0.get("receivedAt").and_then(Value::as_str)
    }
}

/// Loose presence check: `null`, `false`, `0` and `""` fail, anything else passes
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
