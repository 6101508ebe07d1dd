//! Request descriptor
//!
//! Everything needed to (re-)issue one logical API call. The body is
//! serialized when the descriptor is built, so a retry sends the same bytes.

use serde::Serialize;
use serde_json::Value;

use crate::errors::{InkpostError, Result};

/// HTTP verbs used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// One logical API call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    /// Path relative to the configured base URL (e.g., "/posts")
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Set once a refresh has been attempted on behalf of this call.
    pub retried: bool,
}

impl RequestDescriptor {
    /// Request without query or body
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None, retried: false }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter only when a value is present.
    #[must_use]
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    /// Returns `InkpostError::Serialization` if `body` cannot be represented
    /// as JSON; nothing has been sent at that point.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            InkpostError::Serialization(format!("Failed to serialize request body: {e}"))
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Flag that a refresh has been spent on this call.
    pub fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Opt out of refresh-and-retry: a 401 is returned to the caller as is.
    #[must_use]
    pub fn without_refresh(mut self) -> Self {
        self.mark_retried();
        self
    }
}
