//! # Inkpost Infrastructure
//!
//! Implementations of the `inkpost-core` ports and the HTTP side of the
//! client.
//!
//! This crate contains:
//! - The resilient API client and typed blog endpoints (`api`)
//! - reqwest transport with connection-level retry (`http`)
//! - Credential stores: memory, JSON file, platform keychain (`storage`)
//! - Session-expired navigators (`session`)
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `inkpost-core`
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod session;
pub mod storage;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientConfig, ApiError, ApiErrorCategory, BlogApi};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use session::{ChannelNavigator, TracingNavigator};
pub use storage::{
    build_store, FileCredentialStore, KeychainCredentialStore, MemoryCredentialStore,
};
