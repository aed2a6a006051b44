//! API client with retry and timeout handling
//!
//! Thin JSON-over-HTTP client for the offer backend. Transport retries live
//! in [`HttpClient`]; this layer adds authentication, the overall timeout,
//! status classification and response unwrapping.

use std::sync::Arc;
use std::time::Duration;

use cvm_domain::ApiConfig;
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::auth::{AccessTokenProvider, StaticTokenProvider};
use super::errors::ApiError;
use crate::http::HttpClient;

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for API (e.g., "https://cvm.example.com/api")
    pub base_url: String,
    /// Timeout for one API call, retries included
    pub timeout: Duration,
    /// Total attempts for idempotent requests
    pub max_attempts: usize,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_attempts: config.max_attempts,
        }
    }
}

/// API client for the offer backend
pub struct ApiClient {
    http_client: Arc<HttpClient>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// `auth` is optional; without it requests carry no `Authorization`
    /// header.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be
    /// created
    pub fn new(
        config: ApiClientConfig,
        auth: Option<Arc<dyn AccessTokenProvider>>,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::Config(format!("Invalid base URL {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!("Base URL cannot be a base: {base_url}")));
        }

        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_attempts)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        Ok(Self { http_client: Arc::new(http_client), auth, base_url, timeout: config.timeout })
    }

    /// Build a client from loaded configuration, authenticating with the
    /// configured token when one is set.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let auth = config.api_token.as_ref().map(|token| {
            Arc::new(StaticTokenProvider::new(token.clone())) as Arc<dyn AccessTokenProvider>
        });
        Self::new(ApiClientConfig::from(config), auth)
    }

    /// Resolve `path` (starting with `/`) against the base URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the result is not a valid URL
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| ApiError::Config(format!("Invalid endpoint {joined}: {e}")))
    }

    /// Execute a GET request with query parameters
    ///
    /// # Errors
    ///
    /// Returns error if request fails or response cannot be deserialized
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        self.execute(Method::GET, url, None).await
    }

    /// Execute a POST request
    ///
    /// # Errors
    ///
    /// Returns error if request fails or response cannot be deserialized
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<T: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let url = self.endpoint(path)?;
        let body = serialize_body(body)?;
        self.execute(Method::POST, url, Some(body)).await
    }

    /// Execute a PUT request
    ///
    /// # Errors
    ///
    /// Returns error if request fails or response cannot be deserialized
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put<T: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let url = self.endpoint(path)?;
        let body = serialize_body(body)?;
        self.execute(Method::PUT, url, Some(body)).await
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<R, ApiError> {
        debug!(%method, url = %url, "API request");

        let mut request = self
            .http_client
            .request(method.clone(), url.clone())
            .header(ACCEPT, "application/json");
        if let Some(auth) = &self.auth {
            let token = auth.access_token().await?;
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let sent = tokio::time::timeout(self.timeout, self.http_client.send(request)).await;
        let response = match sent {
            Ok(Ok(resp)) => resp,
            Ok(Err(err)) => return Err(ApiError::from(err)),
            Err(_) => return Err(ApiError::Timeout(self.timeout)),
        };

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            let err = map_status_error(status, &url, &bytes);
            warn!(%method, url = %url, %status, error = %err, "API request failed");
            return Err(err);
        }

        let result = decode_body(status, &bytes)?;
        info!(%method, url = %url, %status, "API request successful");
        Ok(result)
    }
}

fn serialize_body<T: Serialize>(body: &T) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::Client(format!("Failed to serialize body: {e}")))
}

/// Classify a non-2xx response.
///
/// Any JSON body makes the response a rejection so its envelope reaches the
/// wizard. Without one, the status decides.
fn map_status_error(status: StatusCode, url: &Url, body: &[u8]) -> ApiError {
    if let Ok(envelope) = serde_json::from_slice::<Value>(body) {
        if !envelope.is_null() {
            return ApiError::Rejected { status: status.as_u16(), envelope };
        }
    }

    let text = String::from_utf8_lossy(body);
    let message = if text.trim().is_empty() {
        format!("{url} returned status {status}")
    } else {
        format!("{url} returned status {status}: {}", text.trim())
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimit(message),
        s if s.is_server_error() => ApiError::Server(message),
        s if s.is_client_error() => ApiError::Client(message),
        _ => ApiError::Network(message),
    }
}

/// Decode a success body, accepting both bare values and `{ "data": ... }`
/// wrappers.
fn decode_body<R: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<R, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        // 204/205 and empty 200s have no body
        return serde_json::from_value(Value::Null).map_err(|_| {
            ApiError::Decode(format!(
                "Empty response ({}), but response type cannot be deserialized from empty body",
                status.as_u16()
            ))
        });
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::Decode(format!("Response is not valid JSON: {e}")))?;
    unwrap_data(value)
}

fn unwrap_data<R: DeserializeOwned>(value: Value) -> Result<R, ApiError> {
    let inner = match &value {
        Value::Object(map) if map.contains_key("data") => map.get("data").cloned(),
        _ => None,
    };

    match serde_json::from_value(value) {
        Ok(result) => Ok(result),
        Err(bare_err) => match inner {
            Some(inner) => serde_json::from_value(inner)
                .map_err(|e| ApiError::Decode(format!("Failed to parse response: {e}"))),
            None => Err(ApiError::Decode(format!("Failed to parse response: {bare_err}"))),
        },
    }
}
