//! HTTP client for the SoftLayer REST API.

use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::credentials::Credentials;
use crate::error::FetchError;
use crate::retry::RetryStrategy;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for slbill.
const USER_AGENT: &str = concat!("slbill/", env!("CARGO_PKG_VERSION"));

/// Error body returned by the SoftLayer API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

/// HTTP client with basic auth and retry.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    retry_strategy: RetryStrategy,
}

impl HttpClient {
    /// Creates a new HTTP client with the default timeout.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: client,
            retry_strategy: RetryStrategy::default(),
        })
    }

    /// Sets the retry strategy for this client.
    #[must_use]
    pub fn with_retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Performs an authenticated GET and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Returns the transport error, [`FetchError::AuthenticationFailed`] on
    /// 401/403, [`FetchError::RateLimited`] once retries are exhausted on 429,
    /// or [`FetchError::Api`] when the API returns an error body.
    #[instrument(skip(self, query, credentials), fields(url = %url, user = %credentials.username))]
    pub async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        credentials: &Credentials,
    ) -> Result<serde_json::Value, FetchError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(attempt, "GET request");

            let result = self
                .inner
                .get(url)
                .query(query)
                .basic_auth(&credentials.username, Some(credentials.api_key()))
                .header(header::ACCEPT, "application/json")
                .send()
                .await;

            let response = match result {
                Ok(response) => response,
                Err(e) => {
                    if self.retry_strategy.can_retry(attempt) && self.retry_strategy.should_retry(&e)
                    {
                        let delay = self.retry_strategy.delay_for_attempt(attempt);
                        warn!(error = %e, delay_ms = delay.as_millis(), "Request failed, retrying");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(e.into());
                }
            };

            let status = response.status();
            debug!(status = %status, "Response received");

            if status.is_success() {
                return Ok(response.json().await?);
            }

            if self.retry_strategy.should_retry_status(status) {
                let retry_after = retry_after_secs(&response);
                if self.retry_strategy.can_retry(attempt) {
                    let delay = self.retry_strategy.delay_for_retry_after(attempt, retry_after);
                    warn!(status = %status, delay_ms = delay.as_millis(), "Retryable status, waiting");
                    tokio::time::sleep(delay).await;
                    continue;
                }
                if status == StatusCode::TOO_MANY_REQUESTS {
                    return Err(FetchError::RateLimited { retry_after });
                }
            }

            return Err(error_from_response(response).await);
        }
    }
}

/// Reads the Retry-After header value in seconds.
fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Converts a non-success response into a [`FetchError`].
async fn error_from_response(response: Response) -> FetchError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error_from_body(status, &body)
}

fn error_from_body(status: StatusCode, body: &str) -> FetchError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        let message = parsed
            .map(|b| b.error)
            .unwrap_or_else(|| "Invalid username or API key".to_string());
        return FetchError::AuthenticationFailed(message);
    }

    match parsed {
        Some(ApiErrorBody { error, code }) => FetchError::Api {
            code: code.unwrap_or_else(|| status.as_u16().to_string()),
            message: error,
        },
        None => FetchError::InvalidResponse(format!("Unexpected status code: {status}")),
    }
}
