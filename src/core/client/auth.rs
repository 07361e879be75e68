//! Homepage config → SAML session → bearer token.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Serialize;

use super::constants::TOKEN_EXPIRY_MARGIN;
use super::token::{BearerToken, SessionCredentials, SessionWire};
use crate::core::GxError;
use crate::core::net::{self, ensure_success};
use crate::core::scrape::{AuthConfig, extract_auth_config};

/// Where the client stands in the login chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// Nothing acquired yet, the last login failed, or the pending session has expired.
    Unauthenticated,
    /// Logged in with a live session; the session token still has to be exchanged.
    SessionAcquired,
    /// Holding a bearer token that is still valid.
    BearerAcquired,
    /// Holding a bearer token whose `exp` has passed; the next call logs in again.
    Expired,
}

#[derive(Debug, Default)]
pub(crate) enum AuthState {
    #[default]
    Unauthenticated,
    SessionAcquired(SessionCredentials),
    BearerAcquired(BearerToken),
}

#[derive(Serialize)]
struct SamlLoginBody<'a> {
    #[serde(rename = "samlResponse")]
    saml_response: &'a str,
    partner: &'a str,
    login: &'a str,
}

impl super::GxClient {
    /// Returns a bearer token that is valid right now, logging in if needed.
    ///
    /// The cached token is reused until shortly before its `exp` claim; after
    /// that the whole chain (homepage config, login, token exchange) runs again.
    /// Concurrent callers share a single refresh.
    ///
    /// # Errors
    ///
    /// Propagates any error of [`fetch_login_config`](Self::fetch_login_config),
    /// [`login`](Self::login) or [`acquire_bearer_token`](Self::acquire_bearer_token).
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn valid_token(&self) -> Result<BearerToken, GxError> {
        // Fast path: a fresh token under the read lock.
        if let Some(t) = self.fresh_token().await {
            return Ok(t);
        }

        // Slow path: one refresh at a time.
        let _guard = self.token_fetch_lock.lock().await;

        // Double-check: another task may have refreshed while this one waited.
        if let Some(t) = self.fresh_token().await {
            return Ok(t);
        }

        self.refresh_token().await
    }

    async fn fresh_token(&self) -> Option<BearerToken> {
        let now = self.clock().now();
        match &*self.auth.read().await {
            AuthState::BearerAcquired(t) if t.is_valid_at(now, TOKEN_EXPIRY_MARGIN) => {
                Some(t.clone())
            }
            _ => None,
        }
    }

    async fn refresh_token(&self) -> Result<BearerToken, GxError> {
        let now = self.clock().now();
        let pending = match &*self.auth.read().await {
            AuthState::SessionAcquired(s) if s.is_live(now) => Some(s.clone()),
            _ => None,
        };

        let session = match pending {
            Some(s) => s,
            None => {
                *self.auth.write().await = AuthState::Unauthenticated;
                #[cfg(feature = "tracing")]
                tracing::debug!("bearer token missing or expired; logging in");
                let config = self.fetch_login_config().await?;
                let session = self.login(&config).await?;
                *self.auth.write().await = AuthState::SessionAcquired(session.clone());
                session
            }
        };

        let token = self.acquire_bearer_token(&session).await?;
        *self.auth.write().await = AuthState::BearerAcquired(token.clone());
        Ok(token)
    }

    /// Scrapes the widget login configuration from the homepage.
    ///
    /// # Errors
    ///
    /// Returns [`GxError::ConfigNotFound`] if the page carries no usable config,
    /// [`GxError::Status`] on a non-2xx homepage, or [`GxError::Http`] on transport failure.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn fetch_login_config(&self) -> Result<AuthConfig, GxError> {
        let url = self.config().homepage_url.clone();
        let resp = ensure_success(self.get(&url, &[], HeaderMap::new()).await?)?;
        let html = net::get_text(resp).await?;
        extract_auth_config(&html)
    }

    /// Performs the SAML login and returns the short-lived session credentials.
    ///
    /// # Errors
    ///
    /// Returns [`GxError::Authentication`] unless the endpoint answers `201 Created`
    /// with a `{sid, expiresAt, token}` body.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, config), err))]
    pub async fn login(&self, config: &AuthConfig) -> Result<SessionCredentials, GxError> {
        let body = SamlLoginBody {
            saml_response: &config.saml_response,
            partner: &config.partner,
            login: &config.login,
        };
        let resp = self
            .post(
                &config.saml_login_url,
                &[("fetchToken", "true")],
                Some(&body),
                HeaderMap::new(),
            )
            .await?;

        let status = resp.status();
        if status != StatusCode::CREATED {
            return Err(GxError::Authentication(format!(
                "SAML login answered {} at {}",
                status.as_u16(),
                resp.url()
            )));
        }

        let text = net::get_text(resp).await?;
        let wire: SessionWire = serde_json::from_str(&text)
            .map_err(|e| GxError::Authentication(format!("SAML login body: {e}")))?;
        wire.try_into()
    }

    /// Exchanges a session token for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`GxError::Authentication`] if the session already expired, the
    /// endpoint does not answer `200 OK`, or the returned token cannot be decoded.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, session), err))]
    pub async fn acquire_bearer_token(
        &self,
        session: &SessionCredentials,
    ) -> Result<BearerToken, GxError> {
        if !session.is_live(self.clock().now()) {
            return Err(GxError::Authentication(format!(
                "session {} expired at {}",
                session.sid, session.expires_at
            )));
        }

        let resp = self
            .post(self.tokens_url(), &[], Some(&session.token), HeaderMap::new())
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(GxError::Authentication(format!(
                "token exchange answered {} at {}",
                status.as_u16(),
                resp.url()
            )));
        }

        let text = net::get_text(resp).await?;
        // Usually a JSON string literal; tolerate a bare token as well.
        let raw = serde_json::from_str::<String>(&text)
            .unwrap_or_else(|_| text.trim().trim_matches('"').to_string());
        BearerToken::parse(raw)
    }

    /// Reports where the client currently stands in the login chain.
    pub async fn auth_phase(&self) -> AuthPhase {
        let now = self.clock().now();
        match &*self.auth.read().await {
            AuthState::SessionAcquired(s) if s.is_live(now) => AuthPhase::SessionAcquired,
            AuthState::Unauthenticated | AuthState::SessionAcquired(_) => {
                AuthPhase::Unauthenticated
            }
            AuthState::BearerAcquired(t) if t.is_valid_at(now, TOKEN_EXPIRY_MARGIN) => {
                AuthPhase::BearerAcquired
            }
            AuthState::BearerAcquired(_) => AuthPhase::Expired,
        }
    }

    /// Forgets the cached token; the next API call logs in again.
    pub async fn invalidate_token(&self) {
        *self.auth.write().await = AuthState::Unauthenticated;
    }
}
