//! Site record cache
//!
//! Maps site id to a built [`SiteRecord`]. The cache is advisory: records are
//! deterministic functions of the id, so a miss only costs a rebuild, and
//! concurrent misses for the same id may both build and insert. Either write
//! may win.
//!
//! ```text
//! get_site(id) → SiteCache::get()
//!                  │
//!                  ├── Hit  → shared record
//!                  │
//!                  └── Miss → geocode + resolve + build → SiteCache::insert()
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::notification::RemovalCause;
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::record::SiteRecord;
use crate::config::CacheConfig;

/// Cache statistics
///
/// All counters are atomic for thread-safe access without locking.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl CacheStats {
    /// Create new cache statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expiration(&self) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }

    /// Create a snapshot of all statistics
    #[must_use]
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            entries: 0,
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.expirations.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of cache statistics
///
/// Plain values for serialization and reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Entries currently cached (approximate)
    pub entries: u64,
}

impl CacheStatsSnapshot {
    /// Calculate hit rate as a percentage
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// In-memory site record cache backed by moka
pub struct SiteCache {
    cache: Cache<String, Arc<SiteRecord>>,
    enabled: bool,
    stats: Arc<CacheStats>,
}

impl std::fmt::Debug for SiteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteCache")
            .field("enabled", &self.enabled)
            .field("entries", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl SiteCache {
    /// Create a cache from configuration
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let stats = Arc::new(CacheStats::new());
        let stats_for_listener = Arc::clone(&stats);

        let mut builder = Cache::builder()
            .max_capacity(config.max_entries.max(1))
            .eviction_listener(move |_key, _value, cause| match cause {
                RemovalCause::Size => stats_for_listener.record_eviction(),
                RemovalCause::Expired => stats_for_listener.record_expiration(),
                RemovalCause::Explicit | RemovalCause::Replaced => {}
            });
        if config.ttl_secs > 0 {
            builder = builder.time_to_live(Duration::from_secs(config.ttl_secs));
        }

        Self {
            cache: builder.build(),
            enabled: config.enabled,
            stats,
        }
    }

    /// Create a disabled cache (always misses)
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(&CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        })
    }

    /// Check if the cache is enabled
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Look up a record by site id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<SiteRecord>> {
        if !self.enabled {
            self.stats.record_miss();
            return None;
        }

        if let Some(record) = self.cache.get(id) {
            self.stats.record_hit();
            debug!(site_id = id, "site cache hit");
            Some(record)
        } else {
            self.stats.record_miss();
            debug!(site_id = id, "site cache miss");
            None
        }
    }

    /// Store a record under its own id
    pub fn insert(&self, record: Arc<SiteRecord>) {
        if !self.enabled {
            return;
        }
        self.cache.insert(record.id().to_string(), record);
        self.stats.record_insert();
    }

    /// Drop every cached record
    pub fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }

    /// Approximate number of cached records
    #[must_use]
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Statistics snapshot including the current entry count
    #[must_use]
    pub fn stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            entries: self.len(),
            ..self.stats.snapshot()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::record::{SiteIdentity, SiteRecordBuilder};
    use crate::zoning::{Coordinate, ZoningResolver};

    fn record(lat: f64, lng: f64) -> Arc<SiteRecord> {
        let coord = Coordinate::new(lat, lng);
        let identity = SiteIdentity {
            id: format!("{lat},{lng}"),
            address: format!("Lat: {lat}, Lng: {lng}"),
            coordinates: coord,
            geocode_fallback: false,
        };
        let resolution = ZoningResolver::builtin().resolve_detailed(coord);
        Arc::new(SiteRecordBuilder::default().build(identity, coord, resolution))
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = SiteCache::new(&CacheConfig::default());
        assert!(cache.get("42.33,-83.045").is_none());

        cache.insert(record(42.33, -83.045));
        let hit = cache.get("42.33,-83.045").unwrap();
        assert_eq!(hit.zoning.district, "B4");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_disabled_cache_always_misses() {
        let cache = SiteCache::disabled();
        assert!(!cache.is_enabled());
        cache.insert(record(1.0, 1.0));
        assert!(cache.get("1,1").is_none());
        assert_eq!(cache.stats().inserts, 0);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_clear() {
        let cache = SiteCache::new(&CacheConfig::default());
        cache.insert(record(1.0, 1.0));
        cache.insert(record(2.0, 2.0));
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.get("1,1").is_none());
        assert!(cache.get("2,2").is_none());
    }

    #[test]
    fn test_replacing_keeps_one_entry() {
        let cache = SiteCache::new(&CacheConfig::default());
        cache.insert(record(1.0, 1.0));
        cache.insert(record(1.0, 1.0));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().evictions, 0);
    }
}
