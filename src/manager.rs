//! Cache manager: lookup, promotion, population, eviction, statistics.
//!
//! [`CacheManager`] is the public surface of the crate. It owns the cache
//! map, the [`FrequencyIndex`] that makes LFU eviction O(1), the
//! [`OrderedStore`] system-of-record, and the dataset snapshot handed to
//! [`initialize`](CacheManager::initialize).
//!
//! ## Access Flow
//!
//! ```text
//!   get(key)
//!      │
//!      ▼
//!   ┌───────────────────────────────────────────────────────────────┐
//!   │ key in cache map?                                             │
//!   │                                                               │
//!   │   HIT  → bump entry counter + tick, promote in the frequency  │
//!   │          index, return &value                                 │
//!   │   MISS → resolve the record:                                  │
//!   │            1. dataset[key]   (only if that record's id == key)│
//!   │            2. OrderedStore::search(key)                       │
//!   │          unresolvable → None, cache untouched                 │
//!   │          resolvable   → evict LFU victim if full, insert at   │
//!   │                         frequency 1                           │
//!   └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! After every completed `get` the cache holds at most `capacity` entries,
//! and every cached key sits at exactly one frequency in the index.

use rustc_hash::FxHashMap;

use crate::ds::FrequencyIndex;
use crate::error::ConfigError;
use crate::stats::{CacheStats, StatsCounters};
use crate::store::OrderedStore;
use crate::traits::Keyed;

/// A cached record plus its access bookkeeping.
///
/// Owned exclusively by the manager's cache map; the counter and tick are
/// bumped in place on every hit.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    value: T,
    access_count: u64,
    last_access: u64,
}

impl<T> CacheEntry<T> {
    /// The cached value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Number of times this entry was accessed, counting the insertion.
    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Logical tick of the most recent access (0 for preloaded entries
    /// that were never hit).
    pub fn last_access(&self) -> u64 {
        self.last_access
    }
}

/// Bounded LFU cache in front of an ordered backing store.
///
/// # Example
///
/// ```
/// use cachesim::manager::CacheManager;
///
/// let mut cache = CacheManager::new(3).unwrap();
/// cache.initialize((0..10u64).collect());
///
/// // Preloaded with the first `capacity` records.
/// assert_eq!(cache.len(), 3);
///
/// assert_eq!(cache.get(1), Some(&1));      // hit
/// assert_eq!(cache.get(9), Some(&9));      // miss, resolved + cached
/// assert_eq!(cache.get(99), None);         // unresolvable
///
/// let stats = cache.statistics();
/// assert_eq!(stats.hits, 1);
/// assert_eq!(stats.misses, 2);
/// ```
#[derive(Debug)]
pub struct CacheManager<T> {
    entries: FxHashMap<u64, CacheEntry<T>>,
    freq_index: FrequencyIndex<u64>,
    storage: OrderedStore<T>,
    dataset: Vec<T>,
    capacity: usize,
    counters: StatsCounters,
    clock: u64,
}

impl<T> CacheManager<T>
where
    T: Keyed + Clone,
{
    /// Creates a manager with the given capacity.
    ///
    /// # Errors
    ///
    /// Zero capacity is an invalid configuration; no instance is
    /// constructed.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("cache capacity must be > 0"));
        }
        Ok(Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            freq_index: FrequencyIndex::with_capacity(capacity),
            storage: OrderedStore::new(),
            dataset: Vec::new(),
            capacity,
            counters: StatsCounters::new(),
            clock: 0,
        })
    }

    /// Installs a dataset: rebuilds the backing store from it, clears the
    /// cache and statistics, and preloads the first
    /// `min(capacity, dataset.len())` records at frequency 1.
    ///
    /// Preloading gives early requests a warm cache instead of an all-miss
    /// ramp-up.
    pub fn initialize(&mut self, dataset: Vec<T>) {
        self.dataset = dataset;
        self.storage.clear();
        for record in &self.dataset {
            self.storage.insert(record.clone());
        }

        self.entries.clear();
        self.freq_index.clear();
        self.counters.reset();
        self.clock = 0;

        let preload = self.capacity.min(self.dataset.len());
        for record in self.dataset.iter().take(preload) {
            let key = record.key();
            if self.freq_index.insert(key) {
                self.entries.insert(
                    key,
                    CacheEntry {
                        value: record.clone(),
                        access_count: 1,
                        last_access: 0,
                    },
                );
            }
        }
    }

    /// Looks up a record by id.
    ///
    /// On a hit the entry is promoted in the frequency index. On a miss
    /// the record is resolved from the dataset or the backing store and
    /// inserted at frequency 1, evicting the least-frequently-used entry
    /// first if the cache is full; an unresolvable id returns `None` and
    /// leaves the cache untouched.
    ///
    /// The returned reference is valid until the entry is evicted or the
    /// cache is cleared or reinitialized; the borrow on `self` already
    /// enforces this.
    pub fn get(&mut self, key: u64) -> Option<&T> {
        self.counters.record_access();
        self.clock += 1;

        if self.entries.contains_key(&key) {
            self.counters.record_hit();
            self.freq_index.touch(&key);
            let clock = self.clock;
            let entry = self.entries.get_mut(&key).expect("cache entry missing");
            entry.access_count += 1;
            entry.last_access = clock;
            return Some(&entry.value);
        }

        self.counters.record_miss();
        let value = self.resolve_miss(key)?;

        if self.entries.len() >= self.capacity {
            if let Some((victim, _)) = self.freq_index.pop_min() {
                self.entries.remove(&victim);
                self.counters.record_eviction();
            }
        }

        self.freq_index.insert(key);
        self.entries.insert(
            key,
            CacheEntry {
                value,
                access_count: 1,
                last_access: self.clock,
            },
        );
        self.entries.get(&key).map(|entry| &entry.value)
    }

    /// Returns a statistics snapshot; a value copy, not a live view.
    pub fn statistics(&self) -> CacheStats {
        self.counters.snapshot()
    }

    /// Read-only view of a cached entry.
    pub fn cache_entry(&self, key: u64) -> Option<&CacheEntry<T>> {
        self.entries.get(&key)
    }

    /// Currently cached keys, in no particular order.
    pub fn cache_keys(&self) -> Vec<u64> {
        self.entries.keys().copied().collect()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of records in the backing store.
    pub fn storage_len(&self) -> usize {
        self.storage.len()
    }

    /// Tears down the cache map, frequency index, backing store, and
    /// dataset; resets statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.freq_index.clear();
        self.storage.clear();
        self.dataset.clear();
        self.counters.reset();
        self.clock = 0;
    }

    /// Resolves a missed id against the dataset or the backing store.
    ///
    /// The positional path is a fast path only: it applies when `key` is a
    /// valid dataset index and the record at that position actually has
    /// this id, so position and identity can never be silently conflated.
    fn resolve_miss(&self, key: u64) -> Option<T> {
        if let Ok(pos) = usize::try_from(key) {
            if let Some(record) = self.dataset.get(pos) {
                if record.key() == key {
                    return Some(record.clone());
                }
            }
        }
        self.storage.search(key).cloned()
    }

    /// Asserts cross-component invariants. Available in debug/test builds.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.entries.len() <= self.capacity);
        assert_eq!(self.entries.len(), self.freq_index.len());
        assert_eq!(self.storage.len(), self.dataset.len());

        for (key, entry) in &self.entries {
            assert_eq!(self.freq_index.frequency(key), Some(entry.access_count));
        }

        self.freq_index.debug_validate_invariants();
        self.storage.debug_validate_invariants();
    }
}
