//! Session manager port.

use async_trait::async_trait;

use super::error::ApiPortResult;
use crate::domain::{Credentials, Session};

/// Port for the authentication token lifecycle.
///
/// Implementations keep the current session internally and attach it to
/// every authorized call; callers never handle the token themselves.
#[async_trait]
pub trait SessionPort: Send + Sync {
    /// Exchange application credentials for a session.
    ///
    /// The credentials are retained so the session can be renewed later.
    async fn authenticate(&self, credentials: &Credentials) -> ApiPortResult<Session>;

    /// Renew the session with the retained credentials.
    ///
    /// Fails with `ApiPortError::Configuration` if `authenticate` never succeeded.
    async fn reauthenticate(&self) -> ApiPortResult<Session>;
}
