//! Resilient API client
//!
//! Every call goes through the same pair of interceptors: the outbound side
//! starts the progress signal and attaches the stored bearer credential, the
//! inbound side ends the signal and unwraps the JSON payload. A 401 on a
//! request that has not been retried yet triggers one refresh-and-retry
//! cycle; if the refresh itself fails the session is torn down.

use std::sync::Arc;
use std::time::Duration;

use inkpost_core::{CredentialStore, NoopProgress, ProgressGuard, ProgressSink, SessionNavigator};
use inkpost_domain::constants::{AUTHORIZATION_SCHEME, REQUEST_ID_HEADER};
use inkpost_domain::{
    ClientConfig, CredentialKey, HttpMethod, RefreshPolicy, RequestDescriptor, SessionConfig,
    SessionExpired,
};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use super::auth::{RefreshFailure, TokenRefresher};
use super::errors::ApiError;
use crate::http::HttpClient;
use crate::session::TracingNavigator;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for API (e.g., "https://blog.example.com/api")
    pub base_url: String,
    /// Timeout for API requests
    pub timeout: Duration,
    /// Total transport attempts for connection failures
    pub transport_attempts: usize,
    /// Overrides the default `inkpost/<version>` agent
    pub user_agent: Option<String>,
    /// Refresh endpoint, login target and redirect delay
    pub session: SessionConfig,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000/api".to_string(),
            timeout: Duration::from_secs(30),
            transport_attempts: 1,
            user_agent: None,
            session: SessionConfig::default(),
        }
    }
}

impl From<&ClientConfig> for ApiClientConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            timeout: config.api.timeout(),
            transport_attempts: config.api.transport_attempts,
            user_agent: config.api.user_agent.clone(),
            session: config.session.clone(),
        }
    }
}

/// A request that failed, with the access credential it was sent with.
struct Rejection {
    error: ApiError,
    credential: Option<String>,
}

/// API client with credential injection and transparent refresh
pub struct ApiClient {
    http_client: HttpClient,
    base_url: Url,
    config: ApiClientConfig,
    store: Arc<dyn CredentialStore>,
    progress: Arc<dyn ProgressSink>,
    navigator: Arc<dyn SessionNavigator>,
    refresher: TokenRefresher,
}

impl ApiClient {
    /// Create a new API client from explicit dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL does not parse or the
    /// transport cannot be built.
    pub fn new(
        config: ApiClientConfig,
        store: Arc<dyn CredentialStore>,
        progress: Arc<dyn ProgressSink>,
        navigator: Arc<dyn SessionNavigator>,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("Invalid base URL {}: {e}", config.base_url)))?;

        let mut http = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.transport_attempts);
        if let Some(agent) = &config.user_agent {
            http = http.user_agent(agent.clone());
        }
        let http_client = http
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        let refresh_url = join_url(&base_url, &config.session.refresh_path)?;
        let refresher = TokenRefresher::new(
            http_client.clone(),
            refresh_url,
            config.timeout,
            Arc::clone(&store),
            config.session.refresh_policy,
        );

        Ok(Self { http_client, base_url, config, store, progress, navigator, refresher })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// The credential store shared with this client
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// How concurrent refreshes are coordinated
    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.refresher.policy()
    }

    /// Whether an access credential is currently stored
    pub async fn is_authenticated(&self) -> bool {
        matches!(self.store.get(CredentialKey::AccessToken).await, Ok(Some(_)))
    }

    /// Run a request through the interceptors and return its JSON payload.
    ///
    /// A 401 on a request not yet retried, with a refresh credential in
    /// storage, is recovered by one refresh call followed by one retry. The
    /// caller sees the retry's outcome. If the refresh fails both credentials
    /// are cleared, a [`SessionExpired`] event is scheduled and the refresh
    /// error is returned.
    ///
    /// # Errors
    ///
    /// Returns the server's structured payload as [`ApiError::Response`], or
    /// a transport / construction error.
    #[instrument(skip(self, request), fields(method = request.method.as_str(), path = %request.path))]
    pub async fn execute(&self, request: RequestDescriptor) -> Result<Value, ApiError> {
        let mut request = request;

        loop {
            let rejection = match self.dispatch(&request).await {
                Ok(payload) => {
                    debug!(retried = request.retried, "request successful");
                    return Ok(payload);
                }
                Err(rejection) => rejection,
            };

            if !self.should_refresh(&rejection.error, &request).await {
                return Err(rejection.error);
            }

            request.mark_retried();
            info!("access credential rejected, attempting refresh");

            match self.refresher.refresh(rejection.credential.as_deref()).await {
                Ok(outcome) => debug!(?outcome, "retrying with refreshed credential"),
                Err(RefreshFailure::Unavailable) => return Err(rejection.error),
                Err(RefreshFailure::Store(err)) => return Err(err),
                Err(RefreshFailure::Rejected(err)) => {
                    self.schedule_session_expired(err.message());
                    return Err(err);
                }
            }
        }
    }

    /// [`execute`](Self::execute) and decode the payload into `T`.
    ///
    /// # Errors
    ///
    /// Same as `execute`, plus [`ApiError::Decode`] if the payload does not
    /// match `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: RequestDescriptor) -> Result<T, ApiError> {
        let payload = self.execute(request).await?;
        serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Execute a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(RequestDescriptor::get(path)).await
    }

    /// Execute a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let request = query.iter().fold(RequestDescriptor::get(path), |request, (key, value)| {
            request.query(*key, *value)
        });
        self.send(request).await
    }

    /// Execute a POST request
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(RequestDescriptor::post(path).json(body)?).await
    }

    /// Execute a PUT request
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(RequestDescriptor::put(path).json(body)?).await
    }

    /// Execute a PATCH request
    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(RequestDescriptor::patch(path).json(body)?).await
    }

    /// Execute a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(RequestDescriptor::delete(path)).await
    }

    /// Health check for API
    ///
    /// Unauthenticated and not progress-tracked.
    ///
    /// # Returns
    ///
    /// `true` if API is reachable and healthy
    ///
    /// # Errors
    ///
    /// Returns error if the API cannot be reached
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<bool, ApiError> {
        let url = join_url(&self.base_url, "/health")?;
        debug!(url = %url, "Health check");

        let request = self.http_client.request(Method::GET, url).timeout(HEALTH_CHECK_TIMEOUT);

        match self.http_client.send(request).await {
            Ok(resp) if resp.status().is_success() => {
                info!("API is healthy");
                Ok(true)
            }
            Ok(resp) => {
                warn!(status = %resp.status(), "API returned non-success status");
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "Health check failed");
                Err(ApiError::from_transport(e, HEALTH_CHECK_TIMEOUT))
            }
        }
    }

    /// One pass through the interceptors. The progress signal spans the
    /// whole pass, including body decoding.
    async fn dispatch(&self, request: &RequestDescriptor) -> Result<Value, Rejection> {
        let _progress = ProgressGuard::start(Arc::clone(&self.progress));

        let credential = self
            .store
            .get(CredentialKey::AccessToken)
            .await
            .map_err(|e| Rejection { error: e.into(), credential: None })?;

        let outcome = match self.build_request(request, credential.as_deref()) {
            Ok(builder) => self.send_and_decode(builder).await,
            Err(error) => Err(error),
        };

        outcome.map_err(|error| Rejection { error, credential })
    }

    fn build_request(
        &self,
        request: &RequestDescriptor,
        credential: Option<&str>,
    ) -> Result<RequestBuilder, ApiError> {
        let mut url = join_url(&self.base_url, &request.path)?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        let request_id = Uuid::now_v7().to_string();
        debug!(url = %url, request_id = %request_id, authenticated = credential.is_some(), "dispatching request");

        let mut builder = self
            .http_client
            .request(to_method(request.method), url)
            .header(REQUEST_ID_HEADER, request_id);

        if let Some(token) = credential {
            let value = HeaderValue::from_str(&format!("{AUTHORIZATION_SCHEME} {token}"))
                .map_err(|_| ApiError::Request("stored access credential is not a valid header value".into()))?;
            builder = builder.header(AUTHORIZATION, value);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder)
    }

    async fn send_and_decode(&self, builder: RequestBuilder) -> Result<Value, ApiError> {
        let timeout = self.config.timeout;
        let response = self
            .http_client
            .send(builder)
            .await
            .map_err(|e| ApiError::from_transport(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, "request rejected");
            return Err(ApiError::from_response(status, &body));
        }

        // No body by definition (RFC 9110)
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return Ok(Value::Null);
        }

        let bytes = response.bytes().await.map_err(|e| ApiError::from_transport(e, timeout))?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Decode(format!("Failed to parse response: {e}")))
    }

    async fn should_refresh(&self, error: &ApiError, request: &RequestDescriptor) -> bool {
        if !error.is_unauthorized() || request.retried {
            return false;
        }

        match self.store.get(CredentialKey::RefreshToken).await {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %e, "could not read refresh credential");
                false
            }
        }
    }

    fn schedule_session_expired(&self, reason: String) {
        let navigator = Arc::clone(&self.navigator);
        let delay = self.config.session.redirect_delay();
        let event = SessionExpired::new(self.config.session.login_path.clone(), reason);

        warn!(redirect_to = %event.redirect_to, ?delay, "session expired");

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            navigator.session_expired(event).await;
        });
    }
}

/// Append `path` to the base URL, keeping any path prefix the base carries.
fn join_url(base: &Url, path: &str) -> Result<Url, ApiError> {
    let base = base.as_str().trim_end_matches('/');
    let joined = if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    };

    Url::parse(&joined).map_err(|e| ApiError::Request(format!("Invalid request URL {joined}: {e}")))
}

const fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    store: Option<Arc<dyn CredentialStore>>,
    progress: Option<Arc<dyn ProgressSink>>,
    navigator: Option<Arc<dyn SessionNavigator>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the credential store
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the progress sink (defaults to no-op)
    pub fn progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Set the navigator notified on session expiry (defaults to logging)
    pub fn navigator(mut self, navigator: Arc<dyn SessionNavigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if the credential store is missing or client creation fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let store =
            self.store.ok_or_else(|| ApiError::Config("Credential store not set".to_string()))?;
        let progress = self.progress.unwrap_or_else(|| Arc::new(NoopProgress));
        let navigator = self.navigator.unwrap_or_else(|| Arc::new(TracingNavigator));

        ApiClient::new(config, store, progress, navigator)
    }
}
