//! Blog API client
//!
//! The resilient client ([`ApiClient`]), the refresh coordinator it uses on
//! 401 responses ([`TokenRefresher`]) and typed endpoint wrappers
//! ([`BlogApi`]).

pub mod auth;
pub mod client;
pub mod commands;
pub mod errors;

pub use auth::{RefreshFailure, RefreshOutcome, TokenRefresher};
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use commands::BlogApi;
pub use errors::{ApiError, ApiErrorCategory};
