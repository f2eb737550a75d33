//! Internal wire types for the Megascans API.
//!
//! These types are internal to `megafetch-api` and are not exposed to
//! consumers. External consumers use the port DTOs defined in
//! `megafetch-core`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::config::ApiClientConfig;
use crate::error::ApiResult;

// ============================================================================
// Configuration (used internally, see config.rs for public config)
// ============================================================================

/// Internal configuration with parsed endpoints.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_base_url: Url,
    pub accounts_base_url: Url,
    pub transfer_base_url: Url,
    pub user_agent: String,
    pub timeout: Duration,
    pub transfer_timeout: Duration,
    pub max_retries: u8,
    pub retry_base_delay: Duration,
}

impl ApiConfig {
    /// Parse the public configuration, rejecting malformed base URLs.
    pub fn from_public(config: &ApiClientConfig) -> ApiResult<Self> {
        Ok(Self {
            api_base_url: Url::parse(&config.api_base_url)?,
            accounts_base_url: Url::parse(&config.accounts_base_url)?,
            transfer_base_url: Url::parse(&config.transfer_base_url)?,
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            transfer_timeout: config.transfer_timeout,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }
}

// ============================================================================
// Identity service
// ============================================================================

/// Body of the token exchange.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub secret: &'a str,
}

/// Response of the token exchange.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds, when reported.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

// ============================================================================
// Catalog
// ============================================================================

/// One page of the asset listing.
#[derive(Debug, Deserialize)]
pub struct AssetListResponse {
    #[serde(default)]
    pub assets: Vec<AssetSummary>,
    /// Total number of pages for the query.
    #[serde(default)]
    pub pages: u32,
}

#[derive(Debug, Deserialize)]
pub struct AssetSummary {
    pub id: String,
}

/// Asset detail. Only the fields the pipeline reads are modelled.
#[derive(Debug, Deserialize)]
pub struct AssetDetail {
    #[serde(default)]
    pub categories: Vec<String>,
}

// ============================================================================
// Download grants
// ============================================================================

/// Body of a download request. Omitting `components` makes it a probe.
#[derive(Debug, Serialize)]
pub struct DownloadRequestBody {
    pub asset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ComponentSpec>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSpec {
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Response of a download request.
#[derive(Debug, Deserialize)]
pub struct DownloadResponse {
    /// Absent on probe responses.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}
