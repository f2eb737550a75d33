//! HTTP backend abstraction for the Megascans API.
//!
//! The production implementation uses reqwest with automatic retry for
//! transient errors. Tests inject `testing::FakeBackend` instead.

use crate::error::{ApiError, ApiResult};
use crate::models::ApiConfig;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Streamed response body.
pub type HttpStream = BoxStream<'static, ApiResult<Bytes>>;

/// How a request authenticates itself.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// Account credentials, used only for the token exchange.
    Basic { username: String, password: String },
    /// Session token for every other call.
    Bearer(String),
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends used by the API client.
///
/// This is an implementation detail; external code uses the core port
/// traits.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET a URL and deserialize the JSON body.
    async fn get_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        auth: &Authorization,
    ) -> ApiResult<T>;

    /// POST a JSON body and deserialize the JSON response.
    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        auth: &Authorization,
        body: &serde_json::Value,
    ) -> ApiResult<T>;

    /// GET a URL and stream the response body.
    async fn get_stream(&self, url: &Url, auth: &Authorization) -> ApiResult<HttpStream>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest with retry logic.
///
/// Network errors, 5xx and 429 are retried with exponential backoff. Other
/// 4xx statuses fail immediately.
pub struct ReqwestBackend {
    client: reqwest::Client,
    transfer_client: reqwest::Client,
    max_retries: u8,
    retry_base_delay: Duration,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        // Archive transfers can be large; only the connect phase uses the API timeout.
        let transfer_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.timeout)
            .timeout(config.transfer_timeout)
            .build()?;

        Ok(Self {
            client,
            transfer_client,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }

    fn authorize(request: reqwest::RequestBuilder, auth: &Authorization) -> reqwest::RequestBuilder {
        match auth {
            Authorization::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Authorization::Bearer(token) => request.bearer_auth(token),
        }
    }

    /// Delay before the given retry attempt (1-based).
    fn backoff(&self, attempt: u8) -> Duration {
        self.retry_base_delay
            .saturating_mul(2u32.saturating_pow(u32::from(attempt) - 1))
    }

    /// Send a request with automatic retry for transient errors.
    async fn send_with_retry<F>(&self, url: &Url, build: F) -> ApiResult<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder + Send + Sync,
    {
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.backoff(attempt);
                tracing::debug!(%url, attempt, ?delay, "Retrying request");
                tokio::time::sleep(delay).await;
            }

            match build().send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    let retryable =
                        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;
                    let body = response.text().await.unwrap_or_default();
                    let error = ApiError::status(status.as_u16(), url.as_str(), &body);

                    if retryable && attempt < self.max_retries {
                        last_error = Some(error);
                        continue;
                    }

                    // 4xx errors or final attempt - fail immediately
                    return Err(error);
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::InvalidResponse {
            message: "Unknown error during request".to_string(),
        }))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        auth: &Authorization,
    ) -> ApiResult<T> {
        let response = self
            .send_with_retry(url, || Self::authorize(self.client.get(url.as_str()), auth))
            .await?;
        Ok(response.json().await?)
    }

    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
        auth: &Authorization,
        body: &serde_json::Value,
    ) -> ApiResult<T> {
        let response = self
            .send_with_retry(url, || {
                Self::authorize(self.client.post(url.as_str()).json(body), auth)
            })
            .await?;
        Ok(response.json().await?)
    }

    async fn get_stream(&self, url: &Url, auth: &Authorization) -> ApiResult<HttpStream> {
        let response = self
            .send_with_retry(url, || {
                Self::authorize(self.transfer_client.get(url.as_str()), auth)
            })
            .await?;
        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ApiError::from))
            .boxed())
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
