//! # Inkpost Domain
//!
//! Domain types shared by the Inkpost API client.
//!
//! This crate contains:
//! - Wire types for the blog and admin API (posts, taxonomy, comments, users)
//! - Credential, request descriptor and payload envelope types
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other Inkpost crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
