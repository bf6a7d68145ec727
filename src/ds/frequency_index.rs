//! Frequency index for O(1) LFU eviction.
//!
//! Tracks an access frequency for every cached key and answers "which key
//! is least frequently used?" in constant time. Keys live in per-frequency
//! buckets; each bucket is a doubly-linked list ordered by recency of
//! promotion, and the buckets themselves form a doubly-linked chain ordered
//! by frequency so the running minimum never needs a scan to repair.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────────┐
//!   │                       FrequencyIndex<K>                         │
//!   │                                                                 │
//!   │   index: FxHashMap<K, usize>        slots: Vec<Slot<K>>         │
//!   │   ┌─────────┬──────┐                ┌─────┬──────────────────┐  │
//!   │   │   key   │ slot │                │ idx │ key, freq, links │  │
//!   │   ├─────────┼──────┤                ├─────┼──────────────────┤  │
//!   │   │    17   │  0   │───────────────►│  0  │ 17, f=2, ◄─►     │  │
//!   │   │    42   │  1   │───────────────►│  1  │ 42, f=1, ◄─►     │  │
//!   │   └─────────┴──────┘                └─────┴──────────────────┘  │
//!   │                                                                 │
//!   │   buckets: FxHashMap<u64, Bucket>   (freq → recency list)       │
//!   │                                                                 │
//!   │   min_freq = 1                                                  │
//!   │       │                                                         │
//!   │       ▼                                                         │
//!   │   f=1: head ─► [42] ◄─► [8] ◄─ tail    head = most recently     │
//!   │       ▲                                promoted, tail = evict   │
//!   │       │ chain                          candidate                │
//!   │       ▼                                                         │
//!   │   f=2: head ─► [17] ◄─ tail                                     │
//!   └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation  | Time | Notes                                     |
//! |------------|------|-------------------------------------------|
//! | `insert`   | O(1) | New key starts at frequency 1             |
//! | `touch`    | O(1) | Increment frequency, move to bucket head  |
//! | `pop_min`  | O(1) | Evict tail of the minimum bucket          |
//! | `remove`   | O(1) | Drop a key, clean up emptied bucket       |
//! | `peek_min` | O(1) | Candidate without removing                |
//!
//! Tie-break: within a frequency bucket the tail is the key least recently
//! promoted into that frequency, so eviction among equal frequencies is
//! least-recently-used.

use std::hash::Hash;

use rustc_hash::FxHashMap;

#[derive(Debug)]
struct Entry<K> {
    key: K,
    freq: u64,
}

#[derive(Debug)]
struct Slot<K> {
    entry: Option<Entry<K>>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A per-frequency recency list plus links to the neighboring frequencies.
///
/// `prev`/`next` point at the nearest non-empty bucket below/above, so
/// advancing `min_freq` after a bucket empties is a pointer follow, never
/// a scan.
#[derive(Debug, Default)]
struct Bucket {
    head: Option<usize>,
    tail: Option<usize>,
    prev: Option<u64>,
    next: Option<u64>,
}

/// O(1) LFU tracker with LRU tie-breaking within a frequency.
///
/// Each key is in exactly one state: absent, or present at frequency
/// `f >= 1`. Transitions are absent→1 on [`insert`](Self::insert), `f`→`f+1`
/// on [`touch`](Self::touch), and present→absent on [`pop_min`](Self::pop_min)
/// or [`remove`](Self::remove). Nothing else.
///
/// # Example
///
/// ```
/// use cachesim::ds::FrequencyIndex;
///
/// let mut index = FrequencyIndex::new();
/// index.insert(1u64);
/// index.insert(2);
/// index.touch(&1); // 1 now at frequency 2
///
/// assert_eq!(index.frequency(&1), Some(2));
/// assert_eq!(index.min_freq(), Some(1));
/// assert_eq!(index.pop_min(), Some((2, 1)));
/// ```
#[derive(Debug)]
pub struct FrequencyIndex<K> {
    slots: Vec<Slot<K>>,
    free_list: Vec<usize>,
    index: FxHashMap<K, usize>,
    buckets: FxHashMap<u64, Bucket>,
    min_freq: u64,
}

impl<K> Default for FrequencyIndex<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FrequencyIndex<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            index: FxHashMap::default(),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    /// Creates an empty index with reserved capacity for keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if `key` is tracked.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the current frequency for `key`, if present.
    ///
    /// # Example
    ///
    /// ```
    /// use cachesim::ds::FrequencyIndex;
    ///
    /// let mut index = FrequencyIndex::new();
    /// index.insert("a");
    /// index.touch(&"a");
    ///
    /// assert_eq!(index.frequency(&"a"), Some(2));
    /// assert_eq!(index.frequency(&"missing"), None);
    /// ```
    #[inline]
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let idx = *self.index.get(key)?;
        Some(self.entry(idx).freq)
    }

    /// Returns the minimum frequency currently present, `None` when empty.
    pub fn min_freq(&self) -> Option<u64> {
        if self.min_freq == 0 {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Inserts a new key at frequency 1.
    ///
    /// A fresh key is always the most recent entry of the minimum bucket,
    /// so it outlives older frequency-1 keys under eviction ties. Returns
    /// `false` if the key is already tracked (no change).
    ///
    /// # Example
    ///
    /// ```
    /// use cachesim::ds::FrequencyIndex;
    ///
    /// let mut index = FrequencyIndex::new();
    /// assert!(index.insert(7u64));
    /// assert!(!index.insert(7));
    /// assert_eq!(index.frequency(&7), Some(1));
    /// assert_eq!(index.min_freq(), Some(1));
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }

        let idx = self.alloc_slot(Entry {
            key: key.clone(),
            freq: 1,
        });
        self.index.insert(key, idx);

        if !self.buckets.contains_key(&1) {
            let next = if self.min_freq == 0 {
                None
            } else {
                Some(self.min_freq)
            };
            self.insert_bucket(1, None, next);
        }
        self.link_front(1, idx);
        self.min_freq = 1;
        true
    }

    /// Increments the frequency of `key` and returns the new value.
    ///
    /// The key moves to the head of its new bucket (most recently
    /// promoted). Returns `None` if the key is absent.
    ///
    /// # Example
    ///
    /// ```
    /// use cachesim::ds::FrequencyIndex;
    ///
    /// let mut index = FrequencyIndex::new();
    /// index.insert("k");
    ///
    /// assert_eq!(index.touch(&"k"), Some(2));
    /// assert_eq!(index.touch(&"k"), Some(3));
    /// assert_eq!(index.touch(&"missing"), None);
    /// ```
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        let idx = *self.index.get(key)?;
        let freq = self.entry(idx).freq;
        if freq == u64::MAX {
            // Saturated: refresh recency within the bucket only.
            self.unlink(freq, idx);
            self.link_front(freq, idx);
            return Some(freq);
        }
        let next_freq = freq + 1;

        let (chain_prev, chain_next) = {
            let bucket = self.buckets.get(&freq)?;
            (bucket.prev, bucket.next)
        };

        self.unlink(freq, idx);
        let emptied = self.bucket_is_empty(freq);
        if emptied {
            self.remove_bucket(freq, chain_prev, chain_next);
            if self.min_freq == freq {
                self.min_freq = chain_next.unwrap_or(0);
            }
        }

        if !self.buckets.contains_key(&next_freq) {
            let prev = if emptied { chain_prev } else { Some(freq) };
            self.insert_bucket(next_freq, prev, chain_next);
        }

        self.entry_mut(idx).freq = next_freq;
        self.link_front(next_freq, idx);
        if self.min_freq == 0 || next_freq < self.min_freq {
            self.min_freq = next_freq;
        }

        Some(next_freq)
    }

    /// Returns the eviction candidate `(key, freq)` without removing it.
    ///
    /// The candidate is the tail of the minimum bucket: among the least
    /// frequent keys, the one least recently promoted.
    ///
    /// # Example
    ///
    /// ```
    /// use cachesim::ds::FrequencyIndex;
    ///
    /// let mut index = FrequencyIndex::new();
    /// index.insert("old");
    /// index.insert("new");
    ///
    /// assert_eq!(index.peek_min(), Some((&"old", 1)));
    /// assert_eq!(index.len(), 2); // not removed
    /// ```
    pub fn peek_min(&self) -> Option<(&K, u64)> {
        if self.min_freq == 0 {
            return None;
        }
        let idx = self.buckets.get(&self.min_freq)?.tail?;
        let entry = self.entry(idx);
        Some((&entry.key, entry.freq))
    }

    /// Removes and returns the eviction candidate `(key, freq)`.
    ///
    /// Returns `None` on an empty index: eviction against nothing is a
    /// no-op, not an error.
    ///
    /// # Example
    ///
    /// ```
    /// use cachesim::ds::FrequencyIndex;
    ///
    /// let mut index = FrequencyIndex::new();
    /// index.insert("a");
    /// index.insert("b");
    /// index.touch(&"b");
    ///
    /// assert_eq!(index.pop_min(), Some(("a", 1)));
    /// assert_eq!(index.pop_min(), Some(("b", 2)));
    /// assert_eq!(index.pop_min(), None);
    /// ```
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        if self.min_freq == 0 {
            return None;
        }
        let freq = self.min_freq;
        let idx = self.buckets.get(&freq)?.tail?;

        let (chain_prev, chain_next) = {
            let bucket = self.buckets.get(&freq)?;
            (bucket.prev, bucket.next)
        };
        self.unlink(freq, idx);
        if self.bucket_is_empty(freq) {
            self.remove_bucket(freq, chain_prev, chain_next);
            self.min_freq = chain_next.unwrap_or(0);
        }

        let entry = self.release_slot(idx);
        self.index.remove(&entry.key);
        Some((entry.key, entry.freq))
    }

    /// Removes `key` from tracking and returns its previous frequency.
    ///
    /// # Example
    ///
    /// ```
    /// use cachesim::ds::FrequencyIndex;
    ///
    /// let mut index = FrequencyIndex::new();
    /// index.insert("k");
    /// index.touch(&"k");
    ///
    /// assert_eq!(index.remove(&"k"), Some(2));
    /// assert_eq!(index.remove(&"k"), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<u64> {
        let idx = self.index.remove(key)?;
        let freq = self.entry(idx).freq;

        let (chain_prev, chain_next) = {
            let bucket = self.buckets.get(&freq)?;
            (bucket.prev, bucket.next)
        };
        self.unlink(freq, idx);
        if self.bucket_is_empty(freq) {
            self.remove_bucket(freq, chain_prev, chain_next);
            if self.min_freq == freq {
                self.min_freq = chain_next.unwrap_or(0);
            }
        }

        let entry = self.release_slot(idx);
        Some(entry.freq)
    }

    /// Iterates over all `(key, frequency)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.entry.as_ref().map(|entry| (&entry.key, entry.freq)))
    }

    /// Clears all state.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    // -- slot bookkeeping -------------------------------------------------

    fn alloc_slot(&mut self, entry: Entry<K>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Slot {
                entry: Some(entry),
                prev: None,
                next: None,
            };
            idx
        } else {
            self.slots.push(Slot {
                entry: Some(entry),
                prev: None,
                next: None,
            });
            self.slots.len() - 1
        }
    }

    fn release_slot(&mut self, idx: usize) -> Entry<K> {
        let entry = self.slots[idx].entry.take().expect("frequency entry missing");
        self.slots[idx].prev = None;
        self.slots[idx].next = None;
        self.free_list.push(idx);
        entry
    }

    fn entry(&self, idx: usize) -> &Entry<K> {
        self.slots[idx]
            .entry
            .as_ref()
            .expect("frequency entry missing")
    }

    fn entry_mut(&mut self, idx: usize) -> &mut Entry<K> {
        self.slots[idx]
            .entry
            .as_mut()
            .expect("frequency entry missing")
    }

    // -- bucket list plumbing ---------------------------------------------

    fn bucket_is_empty(&self, freq: u64) -> bool {
        self.buckets
            .get(&freq)
            .map(|bucket| bucket.head.is_none())
            .unwrap_or(true)
    }

    fn insert_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                head: None,
                tail: None,
                prev,
                next,
            },
        );
        if let Some(prev) = prev {
            if let Some(bucket) = self.buckets.get_mut(&prev) {
                bucket.next = Some(freq);
            }
        }
        if let Some(next) = next {
            if let Some(bucket) = self.buckets.get_mut(&next) {
                bucket.prev = Some(freq);
            }
        }
    }

    fn remove_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        if let Some(prev) = prev {
            if let Some(bucket) = self.buckets.get_mut(&prev) {
                bucket.next = next;
            }
        }
        if let Some(next) = next {
            if let Some(bucket) = self.buckets.get_mut(&next) {
                bucket.prev = prev;
            }
        }
        self.buckets.remove(&freq);
    }

    fn link_front(&mut self, freq: u64, idx: usize) {
        let bucket = self.buckets.get_mut(&freq).expect("frequency bucket missing");
        let old_head = bucket.head;
        self.slots[idx].prev = None;
        self.slots[idx].next = old_head;
        if let Some(head) = old_head {
            self.slots[head].prev = Some(idx);
        } else {
            bucket.tail = Some(idx);
        }
        bucket.head = Some(idx);
    }

    fn unlink(&mut self, freq: u64, idx: usize) {
        let (prev, next) = {
            let slot = &self.slots[idx];
            (slot.prev, slot.next)
        };
        match prev {
            Some(prev_idx) => self.slots[prev_idx].next = next,
            None => {
                if let Some(bucket) = self.buckets.get_mut(&freq) {
                    bucket.head = next;
                }
            }
        }
        match next {
            Some(next_idx) => self.slots[next_idx].prev = prev,
            None => {
                if let Some(bucket) = self.buckets.get_mut(&freq) {
                    bucket.tail = prev;
                }
            }
        }
        self.slots[idx].prev = None;
        self.slots[idx].next = None;
    }

    /// Asserts every structural invariant. Available in debug/test builds.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        let live = self.slots.iter().filter(|slot| slot.entry.is_some()).count();
        assert_eq!(live, self.index.len());

        if self.is_empty() {
            assert!(self.buckets.is_empty());
            assert_eq!(self.min_freq, 0);
            return;
        }

        assert!(self.min_freq > 0);
        assert!(self.buckets.contains_key(&self.min_freq));

        for (&freq, bucket) in &self.buckets {
            assert!(bucket.head.is_some());
            assert!(bucket.tail.is_some());
            if let Some(prev) = bucket.prev {
                assert!(prev < freq);
                assert_eq!(self.buckets[&prev].next, Some(freq));
            } else {
                assert_eq!(self.min_freq, freq);
            }
            if let Some(next) = bucket.next {
                assert!(next > freq);
                assert_eq!(self.buckets[&next].prev, Some(freq));
            }

            let mut current = bucket.head;
            let mut last = None;
            let mut count = 0usize;
            while let Some(idx) = current {
                let slot = &self.slots[idx];
                let entry = slot.entry.as_ref().expect("bucket entry missing");
                assert_eq!(entry.freq, freq);
                assert_eq!(slot.prev, last);
                assert_eq!(self.index.get(&entry.key), Some(&idx));
                last = Some(idx);
                current = slot.next;
                count += 1;
            }
            assert_eq!(bucket.tail, last);
            assert!(count > 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_starts_at_frequency_one() {
        let mut index = FrequencyIndex::new();
        assert!(index.insert(1u64));
        assert_eq!(index.frequency(&1), Some(1));
        assert_eq!(index.min_freq(), Some(1));
        assert!(!index.insert(1));
        assert_eq!(index.len(), 1);
        index.debug_validate_invariants();
    }

    #[test]
    fn touch_increments_by_one() {
        let mut index = FrequencyIndex::new();
        index.insert(1u64);
        for expected in 2..=10 {
            assert_eq!(index.touch(&1), Some(expected));
            assert_eq!(index.frequency(&1), Some(expected));
            index.debug_validate_invariants();
        }
        assert_eq!(index.touch(&99), None);
    }

    #[test]
    fn pop_min_evicts_least_frequent() {
        let mut index = FrequencyIndex::new();
        index.insert(1u64);
        index.insert(2);
        index.insert(3);
        index.touch(&1);
        index.touch(&1);
        index.touch(&2);

        // 3 is the only key at frequency 1.
        assert_eq!(index.pop_min(), Some((3, 1)));
        assert_eq!(index.pop_min(), Some((2, 2)));
        assert_eq!(index.pop_min(), Some((1, 3)));
        assert_eq!(index.pop_min(), None);
        index.debug_validate_invariants();
    }

    #[test]
    fn ties_break_least_recently_promoted() {
        let mut index = FrequencyIndex::new();
        index.insert(1u64);
        index.insert(2);
        index.insert(3);

        // All at frequency 1: eviction follows insertion order.
        assert_eq!(index.pop_min(), Some((1, 1)));

        // Promote 2 and 3 to frequency 2, 2 first: 2 is now the older
        // resident of the tier and goes first.
        index.touch(&2);
        index.touch(&3);
        assert_eq!(index.pop_min(), Some((2, 2)));
        assert_eq!(index.pop_min(), Some((3, 2)));
    }

    #[test]
    fn fresh_insert_outlives_older_ties() {
        let mut index = FrequencyIndex::new();
        index.insert(1u64);
        index.insert(2);
        // 1 was inserted before 2, so 1 is evicted first even though both
        // are at the minimum frequency.
        assert_eq!(index.peek_min(), Some((&1, 1)));
        index.insert(3);
        assert_eq!(index.pop_min(), Some((1, 1)));
        assert_eq!(index.pop_min(), Some((2, 1)));
        assert_eq!(index.pop_min(), Some((3, 1)));
    }

    #[test]
    fn min_freq_repairs_after_bucket_empties() {
        let mut index = FrequencyIndex::new();
        index.insert(1u64);
        index.insert(2);
        index.touch(&1);
        index.touch(&2);
        // Frequency-1 bucket is gone; minimum must now be 2.
        assert_eq!(index.min_freq(), Some(2));
        index.touch(&1);
        index.touch(&1);
        assert_eq!(index.min_freq(), Some(2));
        index.touch(&2);
        index.touch(&2);
        // Both moved past 2; minimum follows the chain to 4.
        assert_eq!(index.min_freq(), Some(4));
        index.debug_validate_invariants();
    }

    #[test]
    fn remove_cleans_up_emptied_bucket() {
        let mut index = FrequencyIndex::new();
        index.insert(1u64);
        index.insert(2);
        index.touch(&2);

        assert_eq!(index.remove(&2), Some(2));
        assert!(!index.contains(&2));
        assert_eq!(index.min_freq(), Some(1));
        index.debug_validate_invariants();

        assert_eq!(index.remove(&1), Some(1));
        assert!(index.is_empty());
        assert_eq!(index.min_freq(), None);
        index.debug_validate_invariants();
    }

    #[test]
    fn pop_on_empty_is_noop() {
        let mut index: FrequencyIndex<u64> = FrequencyIndex::new();
        assert_eq!(index.pop_min(), None);
        assert_eq!(index.peek_min(), None);
        index.debug_validate_invariants();
    }

    #[test]
    fn clear_resets_everything() {
        let mut index = FrequencyIndex::new();
        index.insert(1u64);
        index.insert(2);
        index.touch(&1);
        index.clear();

        assert!(index.is_empty());
        assert_eq!(index.min_freq(), None);
        assert_eq!(index.pop_min(), None);
        index.debug_validate_invariants();

        // Reusable after clear.
        assert!(index.insert(1));
        assert_eq!(index.frequency(&1), Some(1));
    }

    #[test]
    fn slot_reuse_after_removal() {
        let mut index = FrequencyIndex::new();
        index.insert(1u64);
        index.insert(2);
        index.pop_min();
        index.insert(3);
        // Slot count stays bounded by the number of live keys ever needed.
        assert_eq!(index.slots.len(), 2);
        index.debug_validate_invariants();
    }

    #[test]
    fn random_ops_preserve_invariants() {
        let mut index = FrequencyIndex::new();
        let mut state = 0x9E37_79B9_u64;
        for _ in 0..2_000 {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let key = (state >> 33) % 64;
            match state % 4 {
                0 => {
                    index.insert(key);
                }
                1 | 2 => {
                    index.touch(&key);
                }
                _ => {
                    index.pop_min();
                }
            }
            index.debug_validate_invariants();

            // The tracked minimum matches a full recount.
            let recount = index.iter().map(|(_, freq)| freq).min();
            assert_eq!(index.min_freq(), recount);
        }
    }
}
