//! Public configuration for the Megascans API client.
//!
//! The internal config with parsed URLs is derived from this when the client
//! is built.

use std::time::Duration;

/// Configuration for the Megascans API client.
///
/// Use the builder methods to customize endpoints, timeouts and retries.
///
/// # Example
///
/// ```
/// use megafetch_api::ApiClientConfig;
/// use std::time::Duration;
///
/// let config = ApiClientConfig::new()
///     .with_timeout(Duration::from_secs(10))
///     .with_max_retries(5);
/// ```
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the catalog API (listings, details, download requests)
    pub(crate) api_base_url: String,
    /// Base URL of the identity service
    pub(crate) accounts_base_url: String,
    /// Base URL of the transfer host
    pub(crate) transfer_base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Timeout for API calls
    pub(crate) timeout: Duration,
    /// Timeout for a whole archive transfer
    pub(crate) transfer_timeout: Duration,
    /// Maximum number of retry attempts for transient errors
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://megascans.se/v1".to_string(),
            accounts_base_url: "https://accounts.quixel.se/api/v1".to_string(),
            transfer_base_url: "http://downloadp.megascans.se".to_string(),
            user_agent: concat!("megafetch/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            transfer_timeout: Duration::from_secs(30 * 60),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl ApiClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the catalog API base URL.
    ///
    /// Defaults to `https://megascans.se/v1`.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the identity service base URL.
    ///
    /// Defaults to `https://accounts.quixel.se/api/v1`.
    #[must_use]
    pub fn with_accounts_base_url(mut self, url: impl Into<String>) -> Self {
        self.accounts_base_url = url.into();
        self
    }

    /// Set the transfer host base URL.
    #[must_use]
    pub fn with_transfer_base_url(mut self, url: impl Into<String>) -> Self {
        self.transfer_base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the timeout for API calls.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout for a single archive transfer.
    ///
    /// Defaults to 30 minutes.
    #[must_use]
    pub const fn with_transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = timeout;
        self
    }

    /// Set the maximum number of retry attempts for transient errors.
    ///
    /// Defaults to 3 retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    ///
    /// Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}
