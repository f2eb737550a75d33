//! Megascans API client.
//!
//! Owns the current session and attaches it to every authorized call.

mod catalog;
mod downloads;
mod session;

use megafetch_core::{Credentials, Session};
use tokio::sync::RwLock;

use crate::config::ApiClientConfig;
use crate::error::ApiResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::ApiConfig;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default client using the reqwest HTTP backend.
pub type DefaultApiClient = ApiClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Session state shared by every call on one client.
#[derive(Default)]
pub(crate) struct SessionState {
    pub(crate) credentials: Option<Credentials>,
    pub(crate) session: Option<Session>,
}

/// Client for the Megascans catalog and download API.
///
/// Generic over an HTTP backend for testing. Use `DefaultApiClient` in
/// production and talk to it through the core port traits.
pub struct ApiClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: ApiConfig,
    pub(crate) state: RwLock<SessionState>,
}

impl DefaultApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &ApiClientConfig) -> ApiResult<Self> {
        let internal_config = ApiConfig::from_public(config)?;
        let backend = ReqwestBackend::new(&internal_config)?;
        Ok(Self::with_backend(internal_config, backend))
    }
}

impl<B: HttpBackend> ApiClient<B> {
    /// Create a new client with a custom backend.
    pub(crate) fn with_backend(config: ApiConfig, backend: B) -> Self {
        Self {
            backend,
            config,
            state: RwLock::new(SessionState::default()),
        }
    }
}
