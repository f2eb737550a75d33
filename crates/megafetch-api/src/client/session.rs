//! Session management: token exchange, re-authentication and the
//! authorized call wrapper.

use std::future::Future;

use chrono::{TimeDelta, Utc};
use megafetch_core::{Credentials, Session};

use super::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::http::{Authorization, HttpBackend};
use crate::models::{TokenRequest, TokenResponse};
use crate::url::build_token_url;

impl<B: HttpBackend> ApiClient<B> {
    /// Exchange credentials for a session and remember both.
    pub(crate) async fn authenticate(&self, credentials: &Credentials) -> ApiResult<Session> {
        let mut state = self.state.write().await;
        let session = self.exchange(credentials).await?;
        state.credentials = Some(credentials.clone());
        state.session = Some(session.clone());
        tracing::info!(username = %credentials.username, "Authenticated");
        Ok(session)
    }

    /// Replace the current session using the stored credentials.
    pub(crate) async fn reauthenticate(&self) -> ApiResult<Session> {
        self.renew(None).await
    }

    /// Renew the session unless another caller already replaced `stale`.
    ///
    /// The write lock is held across the exchange so concurrent callers
    /// that saw the same rejected token wait for one renewal and reuse it.
    async fn renew(&self, stale: Option<&str>) -> ApiResult<Session> {
        let mut state = self.state.write().await;

        if let (Some(stale), Some(current)) = (stale, state.session.as_ref()) {
            if current.access_token != stale {
                return Ok(current.clone());
            }
        }

        let credentials = state
            .credentials
            .clone()
            .ok_or_else(|| ApiError::NotAuthenticated {
                message: "no credentials stored; authenticate first".to_string(),
            })?;

        let session = self.exchange(&credentials).await?;
        state.session = Some(session.clone());
        tracing::info!("Session renewed");
        Ok(session)
    }

    async fn exchange(&self, credentials: &Credentials) -> ApiResult<Session> {
        let url = build_token_url(&self.config, &credentials.app_id);
        let auth = Authorization::Basic {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        };
        let body = serde_json::to_value(TokenRequest {
            secret: &credentials.app_key,
        })?;

        let response: TokenResponse = self.backend.post_json(&url, &auth, &body).await?;
        if response.token.is_empty() {
            return Err(ApiError::InvalidResponse {
                message: "token exchange returned an empty token".to_string(),
            });
        }

        let mut session = Session::new(response.token, response.refresh_token);
        if let Some(expiry) = response
            .expires_in
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        {
            session = session.with_expiry(expiry);
        }
        Ok(session)
    }

    async fn bearer(&self) -> ApiResult<String> {
        self.state
            .read()
            .await
            .session
            .as_ref()
            .map(|s| s.access_token.clone())
            .ok_or_else(|| ApiError::NotAuthenticated {
                message: "no session; authenticate first".to_string(),
            })
    }

    /// Run an authorized call, renewing the session and replaying once on 401.
    pub(crate) async fn with_bearer<T, F, Fut>(&self, call: F) -> ApiResult<T>
    where
        F: Fn(Authorization) -> Fut + Send + Sync,
        Fut: Future<Output = ApiResult<T>> + Send,
        T: Send,
    {
        let token = self.bearer().await?;
        match call(Authorization::Bearer(token.clone())).await {
            Err(e) if e.is_unauthorized() => {
                tracing::info!("Session rejected, re-authenticating");
                let session = self.renew(Some(&token)).await?;
                call(Authorization::Bearer(session.access_token)).await
            }
            other => other,
        }
    }
}
