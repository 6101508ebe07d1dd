//! Platform keychain credential store
//!
//! One keychain entry per storage key under a shared service name
//! (macOS Keychain Access, Windows Credential Manager, Secret Service on
//! Linux). Keychain calls block, so they run on the blocking pool.

use async_trait::async_trait;
use inkpost_core::CredentialStore;
use inkpost_domain::{CredentialKey, InkpostError, Result};
use keyring::Entry;
use tracing::debug;

use crate::errors::InfraError;

#[derive(Debug, Clone)]
pub struct KeychainCredentialStore {
    service_name: String,
}

impl KeychainCredentialStore {
    /// # Arguments
    /// * `service_name` - Service identifier (e.g., "Inkpost.api")
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    /// Keychain service the entries live under
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    async fn with_entry<T, F>(&self, key: CredentialKey, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> std::result::Result<T, keyring::Error> + Send + 'static,
    {
        let service = self.service_name.clone();
        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, key.as_str()).map_err(InfraError::from)?;
            op(entry).map_err(|e| InkpostError::from(InfraError::from(e)))
        })
        .await
        .map_err(|e| InkpostError::Internal(format!("keychain task failed: {e}")))?
    }
}

#[async_trait]
impl CredentialStore for KeychainCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>> {
        debug!(service = %self.service_name, key = %key, "Retrieving credential from keychain");

        self.with_entry(key, |entry| match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        })
        .await
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<()> {
        debug!(service = %self.service_name, key = %key, "Storing credential in keychain");

        let value = value.to_string();
        self.with_entry(key, move |entry| entry.set_password(&value)).await
    }

    async fn remove(&self, key: CredentialKey) -> Result<()> {
        debug!(service = %self.service_name, key = %key, "Deleting credential from keychain");

        self.with_entry(key, |entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_service_name() {
        let store = KeychainCredentialStore::new("Inkpost.test");
        assert_eq!(store.service_name(), "Inkpost.test");
    }

    #[tokio::test]
    #[ignore = "requires platform keychain access"]
    async fn round_trip_against_platform_keychain() {
        let store = KeychainCredentialStore::new("Inkpost.test.keychain");

        store.set(CredentialKey::AccessToken, "T1").await.unwrap();
        assert_eq!(store.get(CredentialKey::AccessToken).await.unwrap().as_deref(), Some("T1"));

        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.get(CredentialKey::AccessToken).await.unwrap(), None);
    }
}
