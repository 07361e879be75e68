//! Session credentials and bearer tokens handed out by the auth endpoints.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

use crate::core::GxError;

/// Short-lived credentials returned by the SAML login.
///
/// Only kept until they have been exchanged for a [`BearerToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    /// Session identifier.
    pub sid: String,
    /// When the session stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// Token to present at the bearer exchange.
    pub token: String,
}

impl SessionCredentials {
    /// Whether the session can still be exchanged at `now`.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Deserialize)]
pub(crate) struct SessionWire {
    sid: String,
    #[serde(rename = "expiresAt")]
    expires_at: i64,
    token: String,
}

impl TryFrom<SessionWire> for SessionCredentials {
    type Error = GxError;

    fn try_from(w: SessionWire) -> Result<Self, Self::Error> {
        let expires_at = DateTime::from_timestamp(w.expires_at, 0).ok_or_else(|| {
            GxError::Authentication(format!("session expiry out of range: {}", w.expires_at))
        })?;
        Ok(Self {
            sid: w.sid,
            expires_at,
            token: w.token,
        })
    }
}

/// A signed bearer token together with its decoded expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken {
    raw: String,
    expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

impl BearerToken {
    /// Decodes the `exp` claim of a JWT.
    ///
    /// The signature is not checked; the API does that on every call.
    ///
    /// # Errors
    ///
    /// Returns [`GxError::Authentication`] if the token is not a three-part JWT,
    /// its payload is not base64url JSON, or it carries no `exp` claim.
    pub fn parse(raw: impl Into<String>) -> Result<Self, GxError> {
        let raw = raw.into();
        let mut parts = raw.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(p), Some(_), None) => p,
            _ => return Err(GxError::Authentication("bearer token is not a JWT".into())),
        };
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| GxError::Authentication(format!("bearer token payload: {e}")))?;
        let claims: Claims = serde_json::from_slice(&bytes)
            .map_err(|e| GxError::Authentication(format!("bearer token claims: {e}")))?;
        let exp = claims
            .exp
            .ok_or_else(|| GxError::Authentication("bearer token has no exp claim".into()))?;
        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| GxError::Authentication(format!("exp claim out of range: {exp}")))?;
        Ok(Self { raw, expires_at })
    }

    /// The token string as sent in the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The instant named by the `exp` claim.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the token is still usable at `now`, keeping `margin` in reserve.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: std::time::Duration) -> bool {
        let margin = TimeDelta::from_std(margin).unwrap_or(TimeDelta::zero());
        now + margin < self.expires_at
    }
}
