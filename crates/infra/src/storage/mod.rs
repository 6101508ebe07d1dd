//! Credential store adapters
//!
//! Implementations of [`CredentialStore`] for in-process, file and platform
//! keychain persistence. [`build_store`] picks one from configuration.

mod file;
mod keychain;
mod memory;

use std::path::PathBuf;
use std::sync::Arc;

pub use file::FileCredentialStore;
use inkpost_core::CredentialStore;
use inkpost_domain::{InkpostError, Result, StorageBackend, StorageConfig};
pub use keychain::KeychainCredentialStore;
pub use memory::MemoryCredentialStore;
use tracing::info;

/// Build the credential store selected by `config.backend`.
///
/// # Errors
/// Returns `InkpostError::Config` when the file backend has no path.
pub fn build_store(config: &StorageConfig) -> Result<Arc<dyn CredentialStore>> {
    let store: Arc<dyn CredentialStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryCredentialStore::new()),
        StorageBackend::File => {
            let path = config.path.as_deref().ok_or_else(|| {
                InkpostError::Config("storage.path is required for the file backend".into())
            })?;
            Arc::new(FileCredentialStore::new(PathBuf::from(path)))
        }
        StorageBackend::Keychain => {
            Arc::new(KeychainCredentialStore::new(config.service_name.clone()))
        }
    };

    info!(backend = %config.backend, "credential store ready");
    Ok(store)
}
