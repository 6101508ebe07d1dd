use std::time::Duration;

use inkpost_domain::InkpostError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// Connection-level retry schedule: exponential backoff, capped at 2^8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportRetry {
    /// Total attempts including the first; never below 1
    pub attempts: usize,
    /// Delay before the first retry, doubled per attempt
    pub base_backoff: Duration,
}

impl TransportRetry {
    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: usize) -> Duration {
        let exponent = u32::try_from(retry.saturating_sub(1).min(8)).unwrap_or(8);
        self.base_backoff.saturating_mul(1u32 << exponent)
    }

    /// Only failures that never produced a response are worth another try.
    fn applies_to(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }
}

impl Default for TransportRetry {
    fn default() -> Self {
        Self { attempts: 1, base_backoff: Duration::from_millis(200) }
    }
}

/// reqwest transport with a per-request timeout and connection-level retry.
///
/// Any HTTP status, including 5xx, is handed back to the caller untouched.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: TransportRetry,
}

impl HttpClient {
    /// Create a builder
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with default timeout and a single attempt.
    pub fn new() -> Result<Self, InkpostError> {
        Self::builder().build()
    }

    /// Transport retry settings
    pub fn retry(&self) -> TransportRetry {
        self.retry
    }

    /// Start a request on the underlying reqwest client
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send `builder`, retrying transport failures per [`TransportRetry`].
    ///
    /// Returns the raw `reqwest::Error` so callers can tell timeouts from
    /// other failures.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, reqwest::Error> {
        let attempts = self.retry.attempts.max(1);
        let mut current = builder;
        let mut attempt = 1;

        loop {
            // Streaming bodies cannot be cloned and get exactly one attempt.
            let spare = if attempt < attempts { current.try_clone() } else { None };

            let err = match current.send().await {
                Ok(response) => {
                    debug!(attempt, status = %response.status(), url = %response.url(), "HTTP response");
                    return Ok(response);
                }
                Err(err) => err,
            };

            match spare {
                Some(next) if TransportRetry::applies_to(&err) => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(attempt, error = %err, ?delay, "transport failure, retrying");
                    tokio::time::sleep(delay).await;
                    current = next;
                    attempt += 1;
                }
                _ => {
                    debug!(attempt, error = %err, "HTTP request failed");
                    return Err(err);
                }
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    retry: TransportRetry,
    user_agent: Option<String>,
}

impl HttpClientBuilder {
    /// Per-request timeout (default 30s)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.retry.attempts = attempts.max(1);
        self
    }

    /// Backoff before the first retry (default 200ms)
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.retry.base_backoff = backoff;
        self
    }

    /// User-Agent header value
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns error if the reqwest client cannot be created
    pub fn build(self) -> Result<HttpClient, InkpostError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(30));
        let agent = self
            .user_agent
            .unwrap_or_else(|| concat!("inkpost/", env!("CARGO_PKG_VERSION")).to_string());

        let client = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(agent)
            .no_proxy()
            .build()
            .map_err(|err| InkpostError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, retry: self.retry })
    }
}
