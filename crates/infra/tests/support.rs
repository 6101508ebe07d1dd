//! Shared fixtures for the infra integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use inkpost_core::ProgressCounter;
use inkpost_domain::{CredentialPair, RefreshPolicy, SessionConfig, SessionExpired};
use inkpost_infra::storage::MemoryCredentialStore;
use inkpost_infra::{ApiClient, ApiClientConfig, ChannelNavigator};
use serde_json::{json, Value};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::MockServer;

pub const REFRESH_PATH: &str = "/auth/refresh-token";

/// A client wired to a mock server with observable collaborators.
pub struct Harness {
    pub server: MockServer,
    pub client: Arc<ApiClient>,
    pub store: Arc<MemoryCredentialStore>,
    pub progress: Arc<ProgressCounter>,
    pub events: UnboundedReceiver<SessionExpired>,
}

pub struct HarnessOptions {
    pub credentials: Option<CredentialPair>,
    pub policy: RefreshPolicy,
    pub redirect_delay: Duration,
    pub timeout: Duration,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            credentials: Some(CredentialPair::new("T1", "R1")),
            policy: RefreshPolicy::Coalesce,
            redirect_delay: Duration::from_millis(20),
            timeout: Duration::from_secs(5),
        }
    }
}

impl Harness {
    /// Harness logged in as `T1` / `R1`.
    pub async fn new() -> Self {
        Self::with_options(HarnessOptions::default()).await
    }

    pub async fn with_options(options: HarnessOptions) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(match &options.credentials {
            Some(pair) => MemoryCredentialStore::with_pair(pair),
            None => MemoryCredentialStore::new(),
        });
        let progress = Arc::new(ProgressCounter::new());
        let (navigator, events) = ChannelNavigator::new();

        let config = ApiClientConfig {
            base_url: server.uri(),
            timeout: options.timeout,
            session: SessionConfig {
                redirect_delay_ms: u64::try_from(options.redirect_delay.as_millis())
                    .expect("delay fits in u64"),
                refresh_policy: options.policy,
                ..SessionConfig::default()
            },
            ..ApiClientConfig::default()
        };

        let client = ApiClient::builder()
            .config(config)
            .store(store.clone())
            .progress(progress.clone())
            .navigator(Arc::new(navigator))
            .build()
            .expect("client should build");

        Self { server, client: Arc::new(client), store, progress, events }
    }

    /// Wait for the next session-expired event.
    pub async fn next_event(&mut self) -> SessionExpired {
        tokio::time::timeout(Duration::from_secs(2), self.events.recv())
            .await
            .expect("session-expired event within 2s")
            .expect("navigator channel open")
    }

    /// Assert no further session-expired event arrives within `window`.
    pub async fn assert_no_event(&mut self, window: Duration) {
        tokio::time::sleep(window).await;
        assert!(
            matches!(self.events.try_recv(), Err(TryRecvError::Empty)),
            "unexpected session-expired event"
        );
    }
}

pub fn unauthorized_body() -> Value {
    json!({ "message": "Token expired" })
}

pub fn refreshed_body(access: &str) -> Value {
    json!({ "data": { "accessToken": access } })
}

pub fn user_json(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{id}@example.com"),
        "name": format!("User {id}"),
        "role": role,
        "createdAt": "2024-03-01T10:00:00Z"
    })
}

pub fn post_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "slug": title.to_lowercase().replace(' ', "-"),
        "content": "Body",
        "status": "published",
        "tags": [{ "id": "t1", "name": "Rust", "slug": "rust" }],
        "viewCount": 12,
        "publishedAt": "2024-03-02T09:00:00Z",
        "createdAt": "2024-03-01T10:00:00Z",
        "updatedAt": "2024-03-02T09:00:00Z"
    })
}
