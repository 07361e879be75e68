//! In-memory store of fetched field matrices.
//!
//! Entries are keyed by symbol and the ordered field-id list of one query.
//! They are overwritten in place on refresh and never evicted; staleness is
//! decided at read time against the client's TTL.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::core::FieldMatrix;

/// Defines how a read interacts with the in-memory field cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Read from the cache if a fresh entry is present; otherwise fetch from the network
    /// and write the response to the cache. (Default)
    #[default]
    Use,
    /// Always fetch from the network, bypassing any cached entry, and write the new response to the cache.
    Refresh,
    /// Always fetch from the network and do not read from or write to the cache.
    Bypass,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    symbol: String,
    fids: String,
}

impl CacheKey {
    pub(crate) fn new(symbol: &str, fids: &[&str]) -> Self {
        Self {
            symbol: symbol.to_string(),
            fids: fids.join(","),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    matrix: FieldMatrix,
    fetched_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub(crate) struct CacheStore {
    map: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl super::GxClient {
    pub(crate) async fn cache_get(&self, key: &CacheKey) -> Option<FieldMatrix> {
        let ttl = TimeDelta::from_std(self.config().cache_ttl).unwrap_or(TimeDelta::MAX);
        let now = self.clock().now();
        let guard = self.cache.map.read().await;
        let entry = guard.get(key)?;
        if now - entry.fetched_at < ttl {
            #[cfg(feature = "tracing")]
            tracing::debug!(symbol = %key.symbol, fids = %key.fids, "field cache hit");
            return Some(entry.matrix.clone());
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(symbol = %key.symbol, fids = %key.fids, "field cache entry stale");
        None
    }

    pub(crate) async fn cache_put(&self, key: CacheKey, matrix: &FieldMatrix) {
        let entry = CacheEntry {
            matrix: matrix.clone(),
            fetched_at: self.clock().now(),
        };
        self.cache.map.write().await.insert(key, entry);
    }

    /// Drops every cached field matrix.
    pub async fn clear_cache(&self) {
        self.cache.map.write().await.clear();
    }
}
