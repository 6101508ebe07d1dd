//! JSON-file credential store
//!
//! Survives process restarts. The file holds a flat object keyed by the
//! storage key names; a missing file reads as an empty store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use inkpost_core::CredentialStore;
use inkpost_domain::{CredentialKey, InkpostError, Result};
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::InfraError;

type Entries = BTreeMap<String, String>;

/// Credential pair persisted as a JSON file
pub struct FileCredentialStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Store backed by `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Backing file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(InfraError::from(e).into()),
        };

        if contents.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            InkpostError::Storage(format!(
                "credential file {} is corrupt: {e}",
                self.path.display()
            ))
        })
    }

    /// Write via a sibling temp file and rename, so readers never see a
    /// partially written file.
    async fn save(&self, entries: &Entries) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(InfraError::from)?;
        }

        let contents = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");

        tokio::fs::write(&tmp, contents).await.map_err(InfraError::from)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(InfraError::from)?;

        debug!(path = %self.path.display(), entries = entries.len(), "credential file written");
        Ok(())
    }

    async fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Entries) + Send,
    {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        mutate(&mut entries);
        self.save(&entries).await
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key.as_str()))
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<()> {
        let value = value.to_string();
        self.update(move |entries| {
            entries.insert(key.as_str().to_string(), value);
        })
        .await
    }

    async fn remove(&self, key: CredentialKey) -> Result<()> {
        self.update(move |entries| {
            entries.remove(key.as_str());
        })
        .await
    }

    async fn clear(&self) -> Result<()> {
        self.update(|entries| {
            for key in CredentialKey::ALL {
                entries.remove(key.as_str());
            }
        })
        .await
    }
}
