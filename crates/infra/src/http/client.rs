use std::time::Duration;

use cvm_domain::CvmError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// How often and how patiently a request is re-sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
    base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_backoff: Duration::from_millis(200) }
    }
}

impl RetryPolicy {
    /// Attempts allowed for `method`. `POST` and `PATCH` get exactly one so a
    /// slow backend never sees the same offer created twice.
    pub fn attempts_for(&self, method: &Method) -> usize {
        if matches!(*method, Method::POST | Method::PATCH) {
            1
        } else {
            self.max_attempts
        }
    }

    /// Pause before retry number `retry` (1-based), doubling each time.
    pub fn delay_before(&self, retry: usize) -> Duration {
        let doublings = u32::try_from(retry.saturating_sub(1).min(8)).unwrap_or(8);
        self.base_backoff.saturating_mul(1 << doublings)
    }
}

/// reqwest client plus a [`RetryPolicy`].
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    policy: RetryPolicy,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send the request, re-sending on 5xx answers and transient transport
    /// failures while the policy allows.
    ///
    /// # Errors
    ///
    /// Returns `CvmError::Network` when the last attempt failed in transport
    /// and `CvmError::Internal` when the request could not be built.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, CvmError> {
        let request = builder.build().map_err(InfraError::from)?;
        let budget = self.policy.attempts_for(request.method());

        let mut attempt = 1;
        loop {
            let this_try = request.try_clone().ok_or_else(|| {
                CvmError::Internal("streaming request bodies cannot be sent".into())
            })?;
            debug!(
                attempt,
                method = %request.method(),
                url = %request.url(),
                "sending HTTP request"
            );

            let outcome = self.client.execute(this_try).await;
            let transient = match &outcome {
                Ok(response) => response.status().is_server_error(),
                Err(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            };
            if attempt >= budget || !transient {
                return outcome.map_err(|err| InfraError::from(err).into());
            }

            let delay = self.policy.delay_before(attempt);
            debug!(attempt, ?delay, "transient HTTP failure, retrying");
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    policy: RetryPolicy,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), policy: RetryPolicy::default() }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts for idempotent methods; at least one.
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.policy.max_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub const fn base_backoff(mut self, backoff: Duration) -> Self {
        self.policy.base_backoff = backoff;
        self
    }

    /// # Errors
    ///
    /// Returns `CvmError` when the TLS backend cannot be initialised.
    pub fn build(self) -> Result<HttpClient, CvmError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .no_proxy()
            .build()
            .map_err(InfraError::from)?;
        Ok(HttpClient { client, policy: self.policy })
    }
}
