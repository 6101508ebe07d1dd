//! Behaviour of the provided `CredentialStore` methods on a minimal store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use inkpost_core::CredentialStore;
use inkpost_domain::{CredentialKey, CredentialPair, Result};

#[derive(Default)]
struct MapStore {
    values: Mutex<HashMap<CredentialKey, String>>,
}

#[async_trait]
impl CredentialStore for MapStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(&key).cloned())
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<()> {
        self.values.lock().unwrap().insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: CredentialKey) -> Result<()> {
        self.values.lock().unwrap().remove(&key);
        Ok(())
    }
}

#[tokio::test]
async fn store_pair_then_read_back() {
    let store = MapStore::default();
    store.store_pair(&CredentialPair::new("A1", "R1")).await.unwrap();

    assert_eq!(store.get(CredentialKey::AccessToken).await.unwrap().as_deref(), Some("A1"));
    assert_eq!(store.pair().await.unwrap(), Some(CredentialPair::new("A1", "R1")));
}

#[tokio::test]
async fn pair_requires_both_credentials() {
    let store = MapStore::default();
    store.set(CredentialKey::AccessToken, "A1").await.unwrap();

    assert_eq!(store.pair().await.unwrap(), None);
}

#[tokio::test]
async fn clear_removes_both_and_is_idempotent() {
    let store = MapStore::default();
    store.store_pair(&CredentialPair::new("A1", "R1")).await.unwrap();

    store.clear().await.unwrap();
    store.clear().await.unwrap();

    assert_eq!(store.get(CredentialKey::AccessToken).await.unwrap(), None);
    assert_eq!(store.get(CredentialKey::RefreshToken).await.unwrap(), None);
}
