//! Response payload shapes
//!
//! Success bodies follow `{ "data": ..., "message"?: ... }`; error bodies
//! carry at least a `message`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured error body returned by the server
///
/// Every rejected call surfaces one of these, so callers can read
/// `message` regardless of what went wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: String,
    /// Remaining fields of the body (validation errors, codes, ...)
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ErrorPayload {
    /// Payload with only a message
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), details: Map::new() }
    }

    /// Build a payload from a raw error body.
    ///
    /// JSON objects keep all their fields; a missing `message` falls back to
    /// an `error` string field, then to `fallback`. Non-JSON bodies become the
    /// message verbatim.
    pub fn from_body(body: &str, fallback: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Self::new(fallback);
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(mut fields)) => {
                let message = match fields.remove("message") {
                    Some(Value::String(message)) if !message.is_empty() => message,
                    Some(other) if !other.is_null() => other.to_string(),
                    _ => fields
                        .get("error")
                        .and_then(Value::as_str)
                        .map_or_else(|| fallback.to_string(), str::to_string),
                };
                Self { message, details: fields }
            }
            Ok(Value::String(message)) => Self::new(message),
            _ => Self::new(trimmed),
        }
    }

    /// Extra field beside `message`
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}

/// Standard success envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

impl<T> Paginated<T> {
    /// True if later pages exist
    pub fn has_more(&self) -> bool {
        u64::from(self.page) * u64::from(self.limit) < self.total
    }
}
