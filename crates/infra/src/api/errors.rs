//! API-specific error types
//!
//! Every rejection carries something a caller can show as a message: the
//! server's structured payload for HTTP errors, a description otherwise.

use std::time::Duration;

use inkpost_domain::{ErrorPayload, InkpostError};
use reqwest::StatusCode;
use thiserror::Error;

use crate::errors::InfraError;

/// Categories of API errors, for callers deciding how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401 / 403
    Authentication,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    /// Other 4xx, or a success body that did not decode
    Client,
    /// No response received
    Network,
    /// The request could not be built or the client is misconfigured
    Config,
}

/// API operation errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("HTTP {status}: {}", .payload.message)]
    Response { status: StatusCode, payload: ErrorPayload },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Failed before anything was sent
    #[error("Invalid request: {0}")]
    Request(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Credential storage error: {0}")]
    Storage(String),

    /// Local authentication failure (e.g. a locked keychain). Never an HTTP
    /// reply, so it never triggers a refresh.
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Build a response error from a raw body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let fallback = status.canonical_reason().unwrap_or("Request failed");
        Self::Response { status, payload: ErrorPayload::from_body(body, fallback) }
    }

    /// Classify a transport failure (no response received).
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return Self::Timeout(timeout);
        }

        match InkpostError::from(InfraError::from(err)) {
            InkpostError::InvalidInput(message) => Self::Request(message),
            InkpostError::Network(message) => Self::Network(message),
            other => Self::Network(other.to_string()),
        }
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured server payload, when the server answered
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            Self::Response { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Human-readable message for any failure
    pub fn message(&self) -> String {
        match self {
            Self::Response { payload, .. } => payload.message.clone(),
            other => other.to_string(),
        }
    }

    /// True only for an HTTP 401 reply
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Response { status, .. } => {
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN {
                    ApiErrorCategory::Authentication
                } else if *status == StatusCode::TOO_MANY_REQUESTS {
                    ApiErrorCategory::RateLimit
                } else if status.is_server_error() {
                    ApiErrorCategory::Server
                } else {
                    ApiErrorCategory::Client
                }
            }
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Decode(_) => ApiErrorCategory::Client,
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::Request(_) | Self::Storage(_) | Self::Config(_) => ApiErrorCategory::Config,
        }
    }
}

impl From<InkpostError> for ApiError {
    fn from(err: InkpostError) -> Self {
        match err {
            InkpostError::Storage(message) => Self::Storage(message),
            InkpostError::Config(message) => Self::Config(message),
            InkpostError::Network(message) => Self::Network(message),
            InkpostError::InvalidInput(message) | InkpostError::Serialization(message) => {
                Self::Request(message)
            }
            InkpostError::Auth(message) => Self::Auth(message),
            InkpostError::Internal(message) => Self::Config(message),
        }
    }
}
