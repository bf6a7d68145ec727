//! Access statistics for the cache manager.
//!
//! Raw event counters live in [`StatsCounters`] and are bumped as the
//! manager works; [`CacheStats`] is the read-side value snapshot with the
//! derived hit rate computed at snapshot time. Deriving on read keeps the
//! counters exact integers and avoids the drift of incrementally averaged
//! floats.

/// Raw access counters, owned by the cache manager.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatsCounters {
    pub hits: u64,
    pub misses: u64,
    pub total_accesses: u64,
    pub evictions: u64,
}

impl StatsCounters {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_access(&mut self) {
        self.total_accesses += 1;
    }

    #[inline]
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    #[inline]
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Produces the read-side snapshot, deriving the hit rate.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            total_accesses: self.total_accesses,
            evictions: self.evictions,
            hit_rate: if self.total_accesses == 0 {
                0.0
            } else {
                100.0 * self.hits as f64 / self.total_accesses as f64
            },
        }
    }
}

/// Snapshot of cache statistics at a point in time.
///
/// A value copy: reading it never perturbs the live counters, and two
/// snapshots taken with no intervening access are identical.
///
/// # Example
///
/// ```
/// use cachesim::manager::CacheManager;
///
/// let mut cache = CacheManager::new(2).unwrap();
/// cache.initialize(vec![10u64, 20, 30]);
/// cache.get(10);
/// cache.get(999);
///
/// let stats = cache.statistics();
/// assert_eq!(stats.total_accesses, 2);
/// assert_eq!(stats.hits, 1);
/// assert_eq!(stats.misses, 1);
/// assert_eq!(stats.hit_rate, 50.0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub total_accesses: u64,
    pub evictions: u64,
    /// `100 × hits / total_accesses`, 0 when nothing was accessed.
    pub hit_rate: f64,
}
