//! Field queries against the quote-info endpoint, with and without the cache.

pub(crate) mod wire;

use crate::core::client::cache::CacheKey;
use crate::core::net::{self, bearer_headers};
use crate::core::{CacheMode, FieldGroup, FieldMatrix, GxClient, GxError};

/* ---------------- Public API ---------------- */

/// Fetches `fids` for `symbol` straight from the network.
///
/// Every requested id must come back; a value of `null` counts as present.
///
/// # Errors
///
/// Returns [`GxError::QuoteFetch`] on a non-200 answer, an undecodable body or
/// missing field ids, and auth or transport errors as they occur.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(client), err))]
pub async fn fetch(client: &GxClient, symbol: &str, fids: &[&str]) -> Result<FieldMatrix, GxError> {
    if fids.is_empty() {
        return Err(GxError::QuoteFetch("at least one field id required".into()));
    }

    let token = client.valid_token().await?;
    let joined = fids.join(",");
    let resp = client
        .get(
            client.quote_info_url(),
            &[("rics", symbol), ("fids", joined.as_str())],
            bearer_headers(token.as_str())?,
        )
        .await?;

    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        return Err(GxError::QuoteFetch(format!(
            "quote info answered {} at {}",
            status.as_u16(),
            resp.url()
        )));
    }

    let body = net::get_text(resp).await?;
    let matrix = wire::parse_matrix(&body, symbol)?;

    let missing = matrix.missing(fids);
    if !missing.is_empty() {
        return Err(GxError::QuoteFetch(format!(
            "{symbol}: response lacks {}",
            missing.join(",")
        )));
    }
    Ok(matrix)
}

/// Returns the cached matrix for (`symbol`, `fids`) while it is younger than the
/// client's cache TTL, otherwise fetches and stores a fresh one.
///
/// # Errors
///
/// Same as [`fetch`]. A failed fetch leaves any previous entry untouched.
pub async fn get_or_fetch(
    client: &GxClient,
    symbol: &str,
    fids: &[&str],
    cache_mode: CacheMode,
) -> Result<FieldMatrix, GxError> {
    let key = CacheKey::new(symbol, fids);

    if cache_mode == CacheMode::Use
        && let Some(m) = client.cache_get(&key).await
    {
        return Ok(m);
    }

    let matrix = fetch(client, symbol, fids).await?;
    if cache_mode != CacheMode::Bypass {
        client.cache_put(key, &matrix).await;
    }
    Ok(matrix)
}

/// [`get_or_fetch`] for a whole field group.
///
/// # Errors
///
/// Same as [`fetch`].
pub async fn fetch_group(
    client: &GxClient,
    symbol: &str,
    group: &FieldGroup,
    cache_mode: CacheMode,
) -> Result<FieldMatrix, GxError> {
    get_or_fetch(client, symbol, group.fids, cache_mode).await
}
