use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum GxError {
    /// An error occurred during an HTTP request (connection failure, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A JSON payload could not be parsed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The embedded login configuration was not found on the homepage.
    ///
    /// This usually means the homepage layout changed upstream.
    #[error("login configuration not found: {0}")]
    ConfigNotFound(String),

    /// The login or the token exchange was rejected.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// No security matched the given ISIN on the configured venue.
    #[error("no security found for ISIN {isin}")]
    SecurityNotFound {
        /// The ISIN that was searched for.
        isin: String,
    },

    /// The given string is not a syntactically valid ISIN.
    #[error("invalid ISIN: {0}")]
    InvalidIsin(String),

    /// The quote endpoint failed or omitted requested field ids.
    #[error("quote fetch failed: {0}")]
    QuoteFetch(String),

    /// A field value was present but had an unexpected shape.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),
}
