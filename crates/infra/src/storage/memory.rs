use std::collections::HashMap;

use async_trait::async_trait;
use inkpost_core::CredentialStore;
use inkpost_domain::{CredentialKey, CredentialPair, Result};
use parking_lot::RwLock;

/// In-process credential store; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<CredentialKey, String>>,
}

impl MemoryCredentialStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a credential pair
    pub fn with_pair(pair: &CredentialPair) -> Self {
        let store = Self::new();
        {
            let mut entries = store.entries.write();
            entries.insert(CredentialKey::AccessToken, pair.access_token.clone());
            entries.insert(CredentialKey::RefreshToken, pair.refresh_token.clone());
        }
        store
    }

    /// True when neither credential is held
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>> {
        Ok(self.entries.read().get(&key).cloned())
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<()> {
        self.entries.write().insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: CredentialKey) -> Result<()> {
        self.entries.write().remove(&key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }
}
