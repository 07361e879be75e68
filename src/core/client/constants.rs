//! Centralized constants for default endpoints, UA and timeouts.

use std::time::Duration;

/// Default desktop UA; the homepage serves its widget config only to browsers.
pub(crate) const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/58.0.3029.110 Safari/537.3"
);

/// Default overall request timeout.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default maximum age of a cached field matrix.
pub(crate) const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(2);

/// Default trading venue used when resolving ISINs.
pub(crate) const DEFAULT_EXCHANGE: &str = "GTX";

/// gettex homepage carrying the embedded widget login configuration.
pub(crate) const DEFAULT_HOMEPAGE_URL: &str = "https://www.gettex.de/";

/// LSEG widget API host (auth, search and quote endpoints hang off it).
pub(crate) const DEFAULT_API_BASE: &str = "https://lseg-widgets.financial.com/";

/// Bearer-token exchange, relative to the API base.
pub(crate) const TOKENS_PATH: &str = "auth/api/v1/tokens";

/// Security search, relative to the API base.
pub(crate) const FIND_SECURITIES_PATH: &str = "rest/api/find/securities";

/// Quote/instrument field query, relative to the API base.
pub(crate) const QUOTE_INFO_PATH: &str = "rest/api/quote/info";

/// A bearer token is treated as expired this long before its `exp` claim.
pub(crate) const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(5);
