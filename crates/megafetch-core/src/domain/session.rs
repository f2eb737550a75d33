//! Authentication types.

use chrono::{DateTime, Utc};
use std::fmt;

/// Application credentials exchanged for a session token.
///
/// Supplied by the configuration layer; never persisted by the pipeline.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account user name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Developer application key (sent as the token request secret).
    pub app_key: String,
    /// Developer application ID.
    pub app_id: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        app_key: impl Into<String>,
        app_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            app_key: app_key.into(),
            app_id: app_id.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("app_key", &"<redacted>")
            .field("app_id", &self.app_id)
            .finish()
    }
}

/// An authenticated session.
///
/// Replaced wholesale on (re)authentication, never mutated in place.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token attached to authorized calls.
    pub access_token: String,
    /// Refresh token returned alongside the access token.
    pub refresh_token: Option<String>,
    /// Expiry, when the identity service reports one.
    pub expiry: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            expiry: None,
        }
    }

    #[must_use]
    pub const fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Whether the session is known to have expired at `now`.
    ///
    /// Sessions without an expiry are never considered expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= now)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expiry", &self.expiry)
            .finish()
    }
}
