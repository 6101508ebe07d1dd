//! # Inkpost Core
//!
//! Ports and pure client-side logic - no HTTP or storage code.
//!
//! This crate contains:
//! - Port interfaces (traits) for the client's collaborators: credential
//!   storage, progress reporting and navigation
//! - The process-wide pending-request counter and its RAII guard
//!
//! ## Architecture Principles
//! - Only depends on `inkpost-domain`
//! - All external effects go through traits
//! - Infrastructure adapters live in `inkpost-infra`

pub mod auth;
pub mod progress;

pub use auth::ports::{CredentialStore, SessionNavigator};
pub use progress::{NoopProgress, ProgressCounter, ProgressGuard, ProgressSink};
