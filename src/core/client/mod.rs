//! Public client surface + builder.
//! Internals are split into `auth` (login → bearer token), `cache` (field matrices),
//! `token` (credential types) and `constants` (UA + defaults).

mod auth;
pub(crate) mod cache;
mod constants;
mod token;

pub use auth::AuthPhase;
pub use cache::CacheMode;
pub use token::{BearerToken, SessionCredentials};

use crate::core::GxError;
use crate::core::clock::{Clock, SystemClock};
use cache::CacheStore;
use constants::{
    DEFAULT_API_BASE, DEFAULT_CACHE_TTL, DEFAULT_EXCHANGE, DEFAULT_HOMEPAGE_URL, DEFAULT_TIMEOUT,
    FIND_SECURITIES_PATH, QUOTE_INFO_PATH, TOKENS_PATH, USER_AGENT,
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use url::Url;

/// Effective settings of a [`GxClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GxConfig {
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// Overall timeout of a single request.
    pub timeout: Duration,
    /// Maximum age of a cached field matrix.
    pub cache_ttl: Duration,
    /// Trading venue passed to the security search.
    pub exchange: String,
    /// Homepage carrying the embedded login configuration.
    pub homepage_url: Url,
    /// Base URL of the widget API.
    pub api_base: Url,
}

/// Client for the gettex quote widgets.
///
/// Cheap to clone; clones share the bearer token and the field cache.
#[derive(Debug, Clone)]
pub struct GxClient {
    http: Client,
    config: Arc<GxConfig>,
    tokens_url: Url,
    find_securities_url: Url,
    quote_info_url: Url,
    clock: Arc<dyn Clock>,

    auth: Arc<RwLock<auth::AuthState>>,
    token_fetch_lock: Arc<Mutex<()>>,
    cache: Arc<CacheStore>,
}

impl Default for GxClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl GxClient {
    /// Create a new builder.
    #[must_use]
    pub fn builder() -> GxClientBuilder {
        GxClientBuilder::default()
    }

    /// The settings this client was built with.
    #[must_use]
    pub fn config(&self) -> &GxConfig {
        &self.config
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
    pub(crate) fn tokens_url(&self) -> &Url {
        &self.tokens_url
    }
    pub(crate) fn find_securities_url(&self) -> &Url {
        &self.find_securities_url
    }
    pub(crate) fn quote_info_url(&self) -> &Url {
        &self.quote_info_url
    }
    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

/* ----------------------- Builder ----------------------- */

/// Builder for [`GxClient`].
#[derive(Debug, Default)]
pub struct GxClientBuilder {
    user_agent: Option<String>,
    timeout: Option<Duration>,
    cache_ttl: Option<Duration>,
    exchange: Option<String>,
    homepage_url: Option<Url>,
    api_base: Option<Url>,
    clock: Option<Arc<dyn Clock>>,
}

impl GxClientBuilder {
    /// Override the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the overall request timeout. Default: 10 seconds.
    #[must_use]
    pub const fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set how long a fetched field group stays fresh. Default: 2 seconds.
    ///
    /// A zero TTL makes every property read hit the network.
    #[must_use]
    pub const fn cache_ttl(mut self, dur: Duration) -> Self {
        self.cache_ttl = Some(dur);
        self
    }

    /// Override the trading venue used for ISIN lookups. Default: `GTX`.
    #[must_use]
    pub fn exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = Some(exchange.into());
        self
    }

    /// Override the homepage scraped for the login configuration.
    #[must_use]
    pub fn homepage_url(mut self, url: Url) -> Self {
        self.homepage_url = Some(url);
        self
    }

    /// Override the widget API base (e.g., `https://lseg-widgets.financial.com/`).
    #[must_use]
    pub fn api_base(mut self, url: Url) -> Self {
        self.api_base = Some(url);
        self
    }

    /// Replace the wall clock used for token expiry and cache staleness.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if a default URL fails to parse or the HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<GxClient, GxError> {
        let homepage_url = match self.homepage_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_HOMEPAGE_URL)?,
        };
        let api_base = match self.api_base {
            Some(u) => with_trailing_slash(u),
            None => Url::parse(DEFAULT_API_BASE)?,
        };

        let config = GxConfig {
            user_agent: self.user_agent.unwrap_or_else(|| USER_AGENT.to_string()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            cache_ttl: self.cache_ttl.unwrap_or(DEFAULT_CACHE_TTL),
            exchange: self
                .exchange
                .unwrap_or_else(|| DEFAULT_EXCHANGE.to_string()),
            homepage_url,
            api_base,
        };

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .cookie_store(true)
            .build()?;

        Ok(GxClient {
            http,
            tokens_url: config.api_base.join(TOKENS_PATH)?,
            find_securities_url: config.api_base.join(FIND_SECURITIES_PATH)?,
            quote_info_url: config.api_base.join(QUOTE_INFO_PATH)?,
            config: Arc::new(config),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            auth: Arc::new(RwLock::new(auth::AuthState::default())),
            token_fetch_lock: Arc::new(Mutex::new(())),
            cache: Arc::new(CacheStore::default()),
        })
    }
}

// `Url::join` drops the last segment of a base without a trailing slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
