use serde_json::Value;

use crate::core::net::{self, bearer_headers, ensure_success};
use crate::core::{GxClient, GxError};
use crate::quote::wire::to_field_value;

const RIC_FID: &str = "x.RIC";

/* ---------------- Public API ---------------- */

/// Resolves an ISIN to the vendor symbol (RIC) on the client's configured venue.
///
/// # Errors
///
/// Returns [`GxError::InvalidIsin`] for a malformed ISIN, [`GxError::SecurityNotFound`]
/// if no record carries a RIC, and auth or transport errors as they occur.
pub async fn resolve(client: &GxClient, isin: &str) -> Result<String, GxError> {
    SecurityResolver::new(client, isin).fetch().await
}

/// A builder for ISIN → RIC lookups against the find-securities endpoint.
#[derive(Debug)]
pub struct SecurityResolver {
    client: GxClient,
    isin: String,
    exchange: String,
}

impl SecurityResolver {
    /// Creates a resolver for `isin` on the client's default venue.
    pub fn new(client: &GxClient, isin: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            isin: isin.into().trim().to_ascii_uppercase(),
            exchange: client.config().exchange.clone(),
        }
    }

    /// Searches on a different venue for this lookup only.
    #[must_use]
    pub fn exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = exchange.into();
        self
    }

    /// Executes the lookup.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(isin = %self.isin, exchange = %self.exchange)))]
    pub async fn fetch(self) -> Result<String, GxError> {
        if !looks_like_isin(&self.isin) {
            return Err(GxError::InvalidIsin(self.isin));
        }

        let token = self.client.valid_token().await?;
        let params = [
            ("fids", RIC_FID),
            ("search", self.isin.as_str()),
            ("searchFor", "ISIN"),
            ("exchanges", self.exchange.as_str()),
            ("isNF", "false"),
        ];
        let resp = self
            .client
            .get(
                self.client.find_securities_url(),
                &params,
                bearer_headers(token.as_str())?,
            )
            .await?;
        let body = net::get_text(ensure_success(resp)?).await?;

        let v: Value = serde_json::from_str(&body)?;
        find_ric(&v).ok_or(GxError::SecurityNotFound { isin: self.isin })
    }
}

/* ---------------- Internal helpers ---------------- */

// Depth-first; arrays are walked in order, so the first listed record wins.
fn find_ric(v: &Value) -> Option<String> {
    match v {
        Value::Object(map) => {
            if let Some(ric) = map
                .get(RIC_FID)
                .and_then(|x| to_field_value(x).as_text())
                .filter(|s| !s.trim().is_empty())
            {
                return Some(ric.trim().to_string());
            }
            map.values().find_map(find_ric)
        }
        Value::Array(items) => items.iter().find_map(find_ric),
        _ => None,
    }
}

// Shape only: two letters, nine alphanumerics, one check digit. Any non-ASCII input fails.
pub(crate) fn looks_like_isin(s: &str) -> bool {
    match s.trim().as_bytes() {
        [c1, c2, body @ .., check] if body.len() == 9 => {
            c1.is_ascii_alphabetic()
                && c2.is_ascii_alphabetic()
                && body.iter().all(u8::is_ascii_alphanumeric)
                && check.is_ascii_digit()
        }
        _ => false,
    }
}
