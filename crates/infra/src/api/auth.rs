//! Credential refresh
//!
//! Exchanges the stored refresh credential for a new access credential via
//! the dedicated refresh endpoint. The call bypasses the client's
//! interceptors: no bearer header, no progress signal, and it is never
//! itself refreshed.

use std::sync::Arc;
use std::time::Duration;

use inkpost_core::CredentialStore;
use inkpost_domain::{
    CredentialKey, Envelope, RefreshPolicy, RefreshRequest, RefreshedCredentials,
};
use reqwest::Method;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::errors::ApiError;
use crate::http::HttpClient;

/// How a successful refresh came about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// This call exchanged the refresh credential
    Refreshed,
    /// Another request rotated the access credential while this one waited
    Reused,
}

/// Why no fresh access credential is available
#[derive(Debug)]
pub enum RefreshFailure {
    /// No refresh credential is stored (never logged in, or a previous
    /// refresh already failed and cleared it)
    Unavailable,
    /// The refresh endpoint rejected the credential or could not be reached.
    /// Both credentials have been cleared.
    Rejected(ApiError),
    /// The credential store itself failed
    Store(ApiError),
}

/// Performs refresh calls and serializes them according to a [`RefreshPolicy`]
pub struct TokenRefresher {
    http: HttpClient,
    endpoint: Url,
    timeout: Duration,
    store: Arc<dyn CredentialStore>,
    policy: RefreshPolicy,
    gate: Mutex<()>,
}

impl TokenRefresher {
    /// Refresher posting to `endpoint` with its own timeout
    pub fn new(
        http: HttpClient,
        endpoint: Url,
        timeout: Duration,
        store: Arc<dyn CredentialStore>,
        policy: RefreshPolicy,
    ) -> Self {
        Self { http, endpoint, timeout, store, policy, gate: Mutex::new(()) }
    }

    /// Active refresh policy
    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// Obtain a fresh access credential.
    ///
    /// `stale_access` is the credential the failed request was sent with.
    /// Under [`RefreshPolicy::Coalesce`] a caller that finds a different
    /// credential already stored (rotated by a concurrent refresh) reuses it
    /// instead of calling the endpoint again.
    #[instrument(skip_all, fields(policy = ?self.policy))]
    pub async fn refresh(
        &self,
        stale_access: Option<&str>,
    ) -> Result<RefreshOutcome, RefreshFailure> {
        let _permit = match self.policy {
            RefreshPolicy::Coalesce => Some(self.gate.lock().await),
            RefreshPolicy::PerRequest => None,
        };

        if self.policy == RefreshPolicy::Coalesce {
            let current = self.read(CredentialKey::AccessToken).await?;
            if current.is_some() && current.as_deref() != stale_access {
                debug!("access credential already rotated by a concurrent refresh");
                return Ok(RefreshOutcome::Reused);
            }
        }

        let Some(refresh_token) = self.read(CredentialKey::RefreshToken).await? else {
            debug!("no refresh credential stored");
            return Err(RefreshFailure::Unavailable);
        };

        match self.request_credentials(refresh_token).await {
            Ok(credentials) => {
                self.persist(&credentials).await?;
                info!(rotated = credentials.refresh_token.is_some(), "access credential refreshed");
                Ok(RefreshOutcome::Refreshed)
            }
            Err(err) => {
                warn!(error = %err, "refresh call failed, clearing credentials");
                if let Err(clear_err) = self.store.clear().await {
                    warn!(error = %clear_err, "failed to clear credentials after refresh failure");
                }
                Err(RefreshFailure::Rejected(err))
            }
        }
    }

    async fn request_credentials(
        &self,
        refresh_token: String,
    ) -> Result<RefreshedCredentials, ApiError> {
        let body = RefreshRequest { refresh_token };
        let builder = self.http.request(Method::POST, self.endpoint.clone()).json(&body);

        let response = self
            .http
            .send(builder)
            .await
            .map_err(|e| ApiError::from_transport(e, self.timeout))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::from_transport(e, self.timeout))?;

        if !status.is_success() {
            return Err(ApiError::from_response(status, &text));
        }

        // The refresh response is not unwrapped by the interceptors, so the
        // credentials sit one level deeper than an ordinary payload.
        serde_json::from_str::<Envelope<RefreshedCredentials>>(&text)
            .map(Envelope::into_data)
            .map_err(|e| ApiError::Decode(format!("refresh response: {e}")))
    }

    async fn persist(&self, credentials: &RefreshedCredentials) -> Result<(), RefreshFailure> {
        self.store
            .set(CredentialKey::AccessToken, &credentials.access_token)
            .await
            .map_err(|e| RefreshFailure::Store(e.into()))?;

        if let Some(rotated) = &credentials.refresh_token {
            self.store
                .set(CredentialKey::RefreshToken, rotated)
                .await
                .map_err(|e| RefreshFailure::Store(e.into()))?;
        }

        Ok(())
    }

    async fn read(&self, key: CredentialKey) -> Result<Option<String>, RefreshFailure> {
        self.store.get(key).await.map_err(|e| RefreshFailure::Store(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use inkpost_domain::CredentialPair;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::storage::MemoryCredentialStore;

    async fn refresher(
        server: &MockServer,
        store: Arc<MemoryCredentialStore>,
        policy: RefreshPolicy,
    ) -> TokenRefresher {
        let endpoint = Url::parse(&format!("{}/auth/refresh-token", server.uri())).unwrap();
        TokenRefresher::new(HttpClient::new().unwrap(), endpoint, Duration::from_secs(5), store, policy)
    }

    #[tokio::test]
    async fn stores_new_access_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .and(body_json(json!({ "refreshToken": "R1" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "accessToken": "T2" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::with_pair(&CredentialPair::new("T1", "R1")));
        let refresher = refresher(&server, store.clone(), RefreshPolicy::Coalesce).await;

        let outcome = refresher.refresh(Some("T1")).await.unwrap();

        assert_eq!(outcome, RefreshOutcome::Refreshed);
        assert_eq!(store.get(CredentialKey::AccessToken).await.unwrap().as_deref(), Some("T2"));
        assert_eq!(store.get(CredentialKey::RefreshToken).await.unwrap().as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn rotated_refresh_credential_is_persisted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({ "data": { "accessToken": "T2", "refreshToken": "R2" } }),
            ))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::with_pair(&CredentialPair::new("T1", "R1")));
        let refresher = refresher(&server, store.clone(), RefreshPolicy::PerRequest).await;

        refresher.refresh(Some("T1")).await.unwrap();

        assert_eq!(store.pair().await.unwrap(), Some(CredentialPair::new("T2", "R2")));
    }

    #[tokio::test]
    async fn rejection_clears_both_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Refresh token expired" })),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::with_pair(&CredentialPair::new("T1", "R1")));
        let refresher = refresher(&server, store.clone(), RefreshPolicy::Coalesce).await;

        let failure = refresher.refresh(Some("T1")).await.unwrap_err();

        match failure {
            RefreshFailure::Rejected(err) => assert_eq!(err.message(), "Refresh token expired"),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn coalesce_reuses_already_rotated_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;

        let store = Arc::new(MemoryCredentialStore::with_pair(&CredentialPair::new("T2", "R1")));
        let refresher = refresher(&server, store, RefreshPolicy::Coalesce).await;

        assert_eq!(refresher.refresh(Some("T1")).await.unwrap(), RefreshOutcome::Reused);
    }

    #[tokio::test]
    async fn missing_refresh_credential_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let store = Arc::new(MemoryCredentialStore::new());
        let refresher = refresher(&server, store, RefreshPolicy::PerRequest).await;

        assert!(matches!(refresher.refresh(None).await, Err(RefreshFailure::Unavailable)));
    }
}
