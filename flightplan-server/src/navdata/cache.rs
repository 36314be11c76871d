//! Caching layer for navigation lookups.
//!
//! Navigation data changes on a 28-day cycle, so successful lookups are
//! cached for a long time. Failed lookups are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use super::NavDataProvider;
use super::database::NavTable;
use super::error::NavError;
use super::types::{AirportRecord, NavRecord};

type ListKey = (NavTable, String);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct NavCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,
}

impl Default for NavCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// A provider wrapped with moka caches.
pub struct CachedNavData<P> {
    inner: P,
    airports: MokaCache<String, Option<AirportRecord>>,
    lists: MokaCache<ListKey, Arc<Vec<NavRecord>>>,
}

impl<P: NavDataProvider> CachedNavData<P> {
    pub fn new(inner: P, config: &NavCacheConfig) -> Self {
        let airports = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let lists = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            airports,
            lists,
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    async fn cached_list(&self, table: NavTable, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        let key = (table, ident.to_string());

        if let Some(cached) = self.lists.get(&key).await {
            return Ok(cached.as_ref().clone());
        }

        let records = match table {
            NavTable::Navaids => self.inner.navaid(ident).await?,
            NavTable::Fixes => self.inner.fix_or_waypoint(ident).await?,
            NavTable::LowAirways => self.inner.low_airway(ident).await?,
            NavTable::HighAirways => self.inner.high_airway(ident).await?,
        };

        self.lists.insert(key, Arc::new(records.clone())).await;
        Ok(records)
    }
}

impl<P: NavDataProvider> NavDataProvider for CachedNavData<P> {
    async fn airport(&self, ident: &str) -> Result<Option<AirportRecord>, NavError> {
        if let Some(cached) = self.airports.get(ident).await {
            return Ok(cached);
        }

        let airport = self.inner.airport(ident).await?;
        self.airports
            .insert(ident.to_string(), airport.clone())
            .await;
        Ok(airport)
    }

    async fn navaid(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        self.cached_list(NavTable::Navaids, ident).await
    }

    async fn fix_or_waypoint(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        self.cached_list(NavTable::Fixes, ident).await
    }

    async fn low_airway(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        self.cached_list(NavTable::LowAirways, ident).await
    }

    async fn high_airway(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        self.cached_list(NavTable::HighAirways, ident).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Counts calls and fails while `failing` is set.
    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    impl CountingProvider {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn answer(&self) -> Result<Vec<NavRecord>, NavError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                Err(NavError::Api {
                    status: 503,
                    message: "down".into(),
                })
            } else {
                Ok(vec![NavRecord::new("GOLD", 1.0, 2.0)])
            }
        }
    }

    impl NavDataProvider for CountingProvider {
        async fn airport(&self, _ident: &str) -> Result<Option<AirportRecord>, NavError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }

        async fn navaid(&self, _ident: &str) -> Result<Vec<NavRecord>, NavError> {
            self.answer()
        }

        async fn fix_or_waypoint(&self, _ident: &str) -> Result<Vec<NavRecord>, NavError> {
            self.answer()
        }

        async fn low_airway(&self, _ident: &str) -> Result<Vec<NavRecord>, NavError> {
            self.answer()
        }

        async fn high_airway(&self, _ident: &str) -> Result<Vec<NavRecord>, NavError> {
            self.answer()
        }
    }

    #[tokio::test]
    async fn repeated_lookup_hits_cache() {
        let cached = CachedNavData::new(CountingProvider::default(), &NavCacheConfig::default());

        let first = cached.fix_or_waypoint("GOLD").await.unwrap();
        let second = cached.fix_or_waypoint("GOLD").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner().calls(), 1);
    }

    #[tokio::test]
    async fn tables_are_cached_separately() {
        let cached = CachedNavData::new(CountingProvider::default(), &NavCacheConfig::default());

        cached.fix_or_waypoint("GOLD").await.unwrap();
        cached.navaid("GOLD").await.unwrap();

        assert_eq!(cached.inner().calls(), 2);
    }

    #[tokio::test]
    async fn missing_airport_is_cached() {
        let cached = CachedNavData::new(CountingProvider::default(), &NavCacheConfig::default());

        assert!(cached.airport("ZZZZ").await.unwrap().is_none());
        assert!(cached.airport("ZZZZ").await.unwrap().is_none());

        assert_eq!(cached.inner().calls(), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let provider = CountingProvider::default();
        provider.failing.store(true, Ordering::SeqCst);
        let cached = CachedNavData::new(provider, &NavCacheConfig::default());

        assert!(cached.low_airway("UL9").await.is_err());

        cached.inner().failing.store(false, Ordering::SeqCst);
        assert_eq!(cached.low_airway("UL9").await.unwrap().len(), 1);
        assert_eq!(cached.inner().calls(), 2);
    }
}
