//! Extract the widget login configuration embedded in the gettex homepage.
//!
//! The homepage ships a JSON object under the `lsegWidgets` key. Depending on
//! the page build it shows up in one of three places:
//!
//! - a `<script type="application/json">` block whose top-level object holds `lsegWidgets`,
//! - an inline script assigning an object literal (`lsegWidgets: {...}` / `"lsegWidgets": {...}`),
//! - a `data-lseg-widgets` attribute holding the HTML-escaped object itself.
//!
//! Any other layout is reported as [`GxError::ConfigNotFound`].

pub(crate) mod utils;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::core::GxError;
use utils::{object_end, scripts, unescape_html};

const CONFIG_KEY: &str = "lsegWidgets";
const CONFIG_ATTR: &str = "data-lseg-widgets=";

/// What the homepage tells us about logging in to the widget API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Absolute URL of the SAML login endpoint.
    pub saml_login_url: Url,
    /// Pre-signed SAML assertion presented at login.
    pub saml_response: String,
    /// Partner (client) identifier.
    pub partner: String,
    /// Login (entity) identifier.
    pub login: String,
}

#[derive(Deserialize)]
struct AuthConfigWire {
    #[serde(rename = "samlLoginUrl")]
    saml_login_url: String,
    #[serde(rename = "samlResponse")]
    saml_response: String,
    partner: String,
    login: String,
}

/// Pulls the [`AuthConfig`] out of the homepage HTML.
///
/// # Errors
///
/// Returns [`GxError::ConfigNotFound`] if no `lsegWidgets` object is present or
/// it lacks one of the required fields, and [`GxError::Url`] if the login URL
/// does not parse.
pub fn extract_auth_config(html: &str) -> Result<AuthConfig, GxError> {
    let value = from_json_scripts(html)
        .or_else(|| from_inline_literal(html))
        .or_else(|| from_data_attribute(html))
        .ok_or_else(|| {
            GxError::ConfigNotFound(format!("no `{CONFIG_KEY}` object in homepage HTML"))
        })?;

    let wire: AuthConfigWire = serde_json::from_value(value)
        .map_err(|e| GxError::ConfigNotFound(format!("`{CONFIG_KEY}` object incomplete: {e}")))?;

    Ok(AuthConfig {
        saml_login_url: Url::parse(&wire.saml_login_url)?,
        saml_response: wire.saml_response,
        partner: wire.partner,
        login: wire.login,
    })
}

fn from_json_scripts(html: &str) -> Option<Value> {
    scripts(html).filter(|s| s.is_json()).find_map(|script| {
        let mut v: Value = serde_json::from_str(script.body.trim()).ok()?;
        v.get_mut(CONFIG_KEY).map(Value::take)
    })
}

fn from_inline_literal(html: &str) -> Option<Value> {
    let mut pos = 0usize;
    while let Some(rel) = html[pos..].find(CONFIG_KEY) {
        let after_key = pos + rel + CONFIG_KEY.len();
        pos = after_key;

        let rest = &html[after_key..];
        let skipped = rest
            .find(|c: char| !(c == '"' || c == '\'' || c == ':' || c == '=' || c.is_whitespace()))?;
        let obj_start = after_key + skipped;
        if html.as_bytes()[obj_start] != b'{' {
            continue;
        }
        let Some(obj_end) = object_end(html, obj_start) else {
            continue;
        };
        if let Ok(v) = serde_json::from_str::<Value>(&html[obj_start..=obj_end])
            && v.is_object()
        {
            return Some(v);
        }
    }
    None
}

fn from_data_attribute(html: &str) -> Option<Value> {
    let start = html.find(CONFIG_ATTR)? + CONFIG_ATTR.len();
    let quote = html[start..].chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let body_start = start + 1;
    let body_end = body_start + html[body_start..].find(quote)?;
    let v: Value = serde_json::from_str(&unescape_html(&html[body_start..body_end])).ok()?;
    v.is_object().then_some(v)
}
