//! Thin request layer shared by every endpoint.
//!
//! User agent and timeout are baked into the `reqwest::Client` when the
//! [`GxClient`](crate::core::GxClient) is built, so every call below carries them.
//! Nothing here retries.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use url::Url;

use crate::core::{GxClient, GxError};

impl GxClient {
    /// Issues a GET with query `params` and extra `headers`.
    pub(crate) async fn get(
        &self,
        url: &Url,
        params: &[(&str, &str)],
        headers: HeaderMap,
    ) -> Result<Response, GxError> {
        let req = self.http().get(url.clone()).query(params).headers(headers);
        send(req).await
    }

    /// Issues a POST with query `params`, an optional JSON body and extra `headers`.
    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        url: &Url,
        params: &[(&str, &str)],
        json: Option<&B>,
        headers: HeaderMap,
    ) -> Result<Response, GxError> {
        let mut req = self.http().post(url.clone()).query(params).headers(headers);
        if let Some(body) = json {
            req = req.json(body);
        }
        send(req).await
    }
}

async fn send(req: RequestBuilder) -> Result<Response, GxError> {
    Ok(req.send().await?)
}

/// Builds the `Authorization: Bearer ...` header for authenticated API calls.
pub(crate) fn bearer_headers(token: &str) -> Result<HeaderMap, GxError> {
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| GxError::Authentication("bearer token is not a valid header value".into()))?;
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Turns any non-2xx response into [`GxError::Status`].
pub(crate) fn ensure_success(resp: Response) -> Result<Response, GxError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(GxError::Status {
            status: status.as_u16(),
            url: resp.url().to_string(),
        })
    }
}

/// Reads the response body as text.
pub(crate) async fn get_text(resp: Response) -> Result<String, GxError> {
    Ok(resp.text().await?)
}
