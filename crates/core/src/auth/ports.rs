//! Port interfaces for credential state and session navigation
//!
//! These traits define the boundaries between the API client and the
//! environment it runs in (keychain, file, browser history, UI router).

use async_trait::async_trait;
use inkpost_domain::{CredentialKey, CredentialPair, Result, SessionExpired};

/// Persistent key/value store for the credential pair
///
/// Shared by every in-flight request. Implementations must tolerate
/// concurrent readers; writes only happen on login, refresh and logout.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read a credential, `None` when absent
    async fn get(&self, key: CredentialKey) -> Result<Option<String>>;

    /// Write a credential, replacing any previous value
    async fn set(&self, key: CredentialKey, value: &str) -> Result<()>;

    /// Delete a credential (idempotent)
    async fn remove(&self, key: CredentialKey) -> Result<()>;

    /// Delete both credentials
    async fn clear(&self) -> Result<()> {
        for key in CredentialKey::ALL {
            self.remove(key).await?;
        }
        Ok(())
    }

    /// Persist a freshly issued pair
    async fn store_pair(&self, pair: &CredentialPair) -> Result<()> {
        self.set(CredentialKey::AccessToken, &pair.access_token).await?;
        self.set(CredentialKey::RefreshToken, &pair.refresh_token).await
    }

    /// Both credentials, if both are present
    async fn pair(&self) -> Result<Option<CredentialPair>> {
        let access = self.get(CredentialKey::AccessToken).await?;
        let refresh = self.get(CredentialKey::RefreshToken).await?;
        Ok(access.zip(refresh).map(|(access, refresh)| CredentialPair::new(access, refresh)))
    }
}

/// Receives the session-expired signal
///
/// In a browser front end this sends the user to the login page; headless
/// callers may just log it.
#[async_trait]
pub trait SessionNavigator: Send + Sync {
    async fn session_expired(&self, event: SessionExpired);
}
