//! LRU page cache controller
//!
//! Owns the entry slab, the bucketed hash index, and the recency list, and
//! enforces the capacity bound: inserting a new key into a full cache evicts
//! the least-recently-used entry first.

use std::fmt::Write;
use std::hash::BuildHasher;

use ahash::RandomState;

use crate::error::{Error, Result};
use crate::index::HashIndex;
use crate::list::RecencyList;
use crate::slab::Slab;
use crate::stats::CacheStats;

/// Fixed-capacity LRU cache mapping page numbers to `P`-byte pages.
///
/// Pages are copied in on `put` and copied out on `get`; the cache never
/// hands out references into its own storage. Capacity and bucket count are
/// fixed at construction.
///
/// # Example
/// ```
/// use norcache::PageCache;
///
/// let mut cache: PageCache<4> = PageCache::new(2, 4).unwrap();
/// cache.put(10, &[0xaa; 4]);
/// cache.put(11, &[0xbb; 4]);
/// cache.put(12, &[0xcc; 4]); // evicts page 10
///
/// assert_eq!(cache.get(10), None);
/// assert_eq!(cache.get(12), Some([0xcc; 4]));
/// ```
pub struct PageCache<const P: usize, S = RandomState> {
    slab: Slab<P>,
    index: HashIndex<S>,
    list: RecencyList,
    capacity: usize,
    stats: CacheStats,
}

impl<const P: usize> PageCache<P> {
    /// Create a cache holding at most `capacity` pages, hashed into
    /// `bucket_count` fixed buckets with the default ahash hasher.
    ///
    /// Returns `Error::InvalidCapacity` / `Error::InvalidBucketCount` when
    /// either is 0.
    pub fn new(capacity: usize, bucket_count: usize) -> Result<Self> {
        Self::with_hasher(capacity, bucket_count, RandomState::new())
    }

    /// Create a cache with a bucket count derived from `capacity` (next
    /// power of two, at least 4).
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Self::new(capacity, capacity.next_power_of_two().max(4))
    }
}

impl<const P: usize, S: BuildHasher> PageCache<P, S> {
    /// Create a cache with a caller-supplied hash state.
    ///
    /// The index reduces the 64-bit hash modulo the bucket count itself, so
    /// any `BuildHasher` is acceptable.
    pub fn with_hasher(capacity: usize, bucket_count: usize, state: S) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        if bucket_count == 0 {
            return Err(Error::InvalidBucketCount(bucket_count));
        }

        Ok(Self {
            slab: Slab::new(capacity),
            index: HashIndex::new(bucket_count, state),
            list: RecencyList::new(),
            capacity,
            stats: CacheStats::new(),
        })
    }

    /// Look up a page, copying it out and promoting it to most-recently-used.
    ///
    /// A miss mutates nothing and is not an error.
    pub fn get(&mut self, key: u32) -> Option<[u8; P]> {
        match self.index.find(&self.slab, key) {
            Some(idx) => {
                self.list.move_to_front(&mut self.slab, idx);
                self.stats.record_hit();
                self.slab.slot(idx).map(|entry| entry.page)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Insert or overwrite a page, making it the most-recently-used entry.
    ///
    /// Inserting a new key into a full cache first evicts the entry at the
    /// LRU tail; overwriting an existing key never evicts.
    pub fn put(&mut self, key: u32, page: &[u8; P]) {
        if let Some(idx) = self.index.find(&self.slab, key) {
            if let Some(entry) = self.slab.slot_mut(idx) {
                entry.page = *page;
            }
            self.list.move_to_front(&mut self.slab, idx);
        } else {
            if self.list.len() == self.capacity {
                self.evict();
            }
            let idx = self.index.insert_new(&mut self.slab, key, page);
            self.list.push_front(&mut self.slab, idx);
            self.stats.record_insert();
        }

        #[cfg(debug_assertions)]
        self.check_invariants();
    }

    /// Remove a page, returning a copy of it; no-op on a missing key.
    pub fn remove(&mut self, key: u32) -> Option<[u8; P]> {
        let idx = self.index.find(&self.slab, key)?;
        self.list.remove(&mut self.slab, idx);
        self.index.unlink(&mut self.slab, idx);
        let page = self.slab.free(idx).map(|entry| entry.page);

        #[cfg(debug_assertions)]
        self.check_invariants();

        page
    }

    /// Drop every entry. Capacity, bucket count, and stats are unchanged.
    pub fn clear(&mut self) {
        self.index.reset();
        self.list.clear();
        self.slab.clear();

        #[cfg(debug_assertions)]
        self.check_invariants();
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of fixed hash buckets
    pub fn bucket_count(&self) -> usize {
        self.index.bucket_count()
    }

    /// Cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Reset the statistics counters
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Human-readable listing of the recency order and bucket contents.
    /// Debugging aid only; the format is not stable.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "PageCache (capacity={}, size={})",
            self.capacity,
            self.len()
        );

        let keys: Vec<String> = self
            .recency_keys()
            .iter()
            .map(|k| k.to_string())
            .collect();
        let _ = writeln!(out, "  recency: {}", keys.join(","));

        for bucket in 0..self.index.bucket_count() {
            let _ = write!(out, "  [{}]: ", bucket);
            let mut cur = self.index.bucket_head(bucket);
            while let Some(idx) = cur {
                match self.slab.slot(idx) {
                    Some(entry) => {
                        let _ = write!(out, "({}, ", entry.key);
                        for byte in entry.page.iter().take(4) {
                            let _ = write!(out, "{:02X}", byte);
                        }
                        let _ = write!(out, "...), ");
                        cur = entry.hash_next;
                    }
                    None => break,
                }
            }
            let _ = writeln!(out);
        }
        out
    }

    /// Evict the LRU tail: detach from both structures, then free the slot.
    fn evict(&mut self) {
        if let Some(victim) = self.list.pop_back(&mut self.slab) {
            self.index.unlink(&mut self.slab, victim);
            self.slab.free(victim);
            self.stats.record_eviction();
        }
    }

    /// Keys in recency order, most-recently-used first
    fn recency_keys(&self) -> Vec<u32> {
        let mut keys = Vec::with_capacity(self.list.len());
        let mut cur = self.list.head();
        while let Some(idx) = cur {
            match self.slab.slot(idx) {
                Some(entry) => {
                    keys.push(entry.key);
                    cur = entry.lru_next;
                }
                None => break,
            }
        }
        keys
    }

    /// Walk both structures and assert the joint invariants: list length ==
    /// live count <= capacity, consistent back-links, every entry in exactly
    /// the bucket its key hashes to, no duplicate keys.
    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        let mut seen = 0;
        let mut prev = None;
        let mut cur = self.list.head();
        while let Some(idx) = cur {
            if seen > self.capacity {
                debug_assert!(false, "recency list cycle or capacity overrun");
                return;
            }
            let entry = match self.slab.slot(idx) {
                Some(entry) => entry,
                None => {
                    debug_assert!(false, "recency list links to freed slot {}", idx);
                    return;
                }
            };
            debug_assert_eq!(entry.lru_prev, prev, "recency back-link mismatch");
            seen += 1;
            prev = cur;
            cur = entry.lru_next;
        }
        debug_assert_eq!(seen, self.list.len(), "recency length mismatch");
        debug_assert_eq!(seen, self.slab.len(), "live count mismatch");
        debug_assert!(seen <= self.capacity, "capacity exceeded");

        let mut keys = Vec::with_capacity(seen);
        for bucket in 0..self.index.bucket_count() {
            let mut cur = self.index.bucket_head(bucket);
            while let Some(idx) = cur {
                let entry = match self.slab.slot(idx) {
                    Some(entry) => entry,
                    None => {
                        debug_assert!(false, "bucket chain links to freed slot {}", idx);
                        return;
                    }
                };
                debug_assert_eq!(
                    self.index.bucket_of(entry.key),
                    bucket,
                    "entry in wrong bucket"
                );
                keys.push(entry.key);
                cur = entry.hash_next;
                if keys.len() > seen {
                    debug_assert!(false, "bucket chain cycle");
                    return;
                }
            }
        }
        let chained = keys.len();
        keys.sort_unstable();
        keys.dedup();
        debug_assert_eq!(keys.len(), chained, "duplicate key across entries");
        debug_assert_eq!(chained, seen, "index and recency list disagree");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::IdentityState;

    const A: [u8; 4] = [0x11, 0x22, 0x33, 0x44];
    const B: [u8; 4] = [0x55, 0x66, 0x77, 0x88];
    const C: [u8; 4] = [0xaa, 0xbb, 0xcc, 0xdd];
    const D: [u8; 4] = [0xee, 0xff, 0x00, 0x11];
    const E: [u8; 4] = [0x12, 0x34, 0x56, 0x78];

    fn cache(capacity: usize) -> PageCache<4, IdentityState> {
        PageCache::with_hasher(capacity, 4, IdentityState).unwrap()
    }

    #[test]
    fn test_basic_put_get() {
        let mut cache = cache(2);

        cache.put(1, &A);
        cache.put(2, &B);

        assert_eq!(cache.get(1), Some(A));
        assert_eq!(cache.get(2), Some(B));
        assert_eq!(cache.len(), 2);
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_eviction() {
        let mut cache = cache(2);

        cache.put(1, &A);
        cache.put(2, &B);
        cache.put(3, &C); // evicts 1

        assert_eq!(cache.get(1), None);
        assert_eq!(cache.get(2), Some(B));
        assert_eq!(cache.get(3), Some(C));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions(), 1);
    }

    #[test]
    fn test_get_promotes() {
        let mut cache = cache(2);

        cache.put(1, &A);
        cache.put(2, &B);
        cache.get(1); // 1 becomes MRU
        cache.put(3, &C); // evicts 2

        assert_eq!(cache.get(1), Some(A));
        assert_eq!(cache.get(2), None);
        assert_eq!(cache.get(3), Some(C));
    }

    #[test]
    fn test_overwrite_keeps_size() {
        let mut cache = cache(2);

        cache.put(1, &A);
        cache.put(1, &B);

        assert_eq!(cache.get(1), Some(B));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let mut cache = cache(2);

        cache.put(1, &A);
        cache.put(2, &B);
        cache.put(1, &C); // overwrite, not an insert

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions(), 0);
        assert_eq!(cache.get(1), Some(C));
        assert_eq!(cache.get(2), Some(B));
    }

    #[test]
    fn test_remove() {
        let mut cache = cache(3);

        cache.put(1, &A);
        cache.put(2, &B);
        cache.put(3, &C);

        assert_eq!(cache.remove(2), Some(B));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(2), None);

        // Removing a missing key is a no-op
        assert_eq!(cache.remove(2), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut cache = cache(3);

        cache.put(1, &A);
        cache.put(2, &B);
        cache.clear();

        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.get(1), None);
        assert_eq!(cache.get(2), None);

        // Behaves like a fresh cache afterwards
        cache.put(1, &C);
        cache.put(2, &D);
        cache.put(3, &E);
        assert_eq!(cache.len(), 3);
        cache.put(4, &A);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(1), None);
    }

    #[test]
    fn test_capacity_one() {
        let mut cache = cache(1);

        cache.put(1, &A);
        cache.put(2, &B);

        assert_eq!(cache.get(1), None);
        assert_eq!(cache.get(2), Some(B));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            PageCache::<4>::new(0, 4),
            Err(Error::InvalidCapacity(0))
        ));
        assert!(matches!(
            PageCache::<4>::new(4, 0),
            Err(Error::InvalidBucketCount(0))
        ));
        assert!(matches!(
            PageCache::<4>::with_capacity(0),
            Err(Error::InvalidCapacity(0))
        ));
    }

    #[test]
    fn test_with_capacity_buckets() {
        let cache = PageCache::<4>::with_capacity(3).unwrap();
        assert_eq!(cache.capacity(), 3);
        assert_eq!(cache.bucket_count(), 4);

        let cache = PageCache::<4>::with_capacity(100).unwrap();
        assert_eq!(cache.bucket_count(), 128);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut cache = cache(3);

        for key in 0..50 {
            cache.put(key, &A);
            assert!(cache.len() <= 3);
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().evictions(), 47);
    }

    #[test]
    fn test_recency_scenario_fill() {
        // put 1,2,3 -> order 3,2,1
        let mut cache = cache(3);
        cache.put(1, &A);
        cache.put(2, &B);
        cache.put(3, &C);

        assert_eq!(cache.recency_keys(), vec![3, 2, 1]);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_recency_scenario_get_then_evict() {
        // get(2) promotes, the next insert evicts 1, not 2
        let mut cache = cache(3);
        cache.put(1, &A);
        cache.put(2, &B);
        cache.put(3, &C);

        assert_eq!(cache.get(2), Some(B));
        assert_eq!(cache.recency_keys(), vec![2, 3, 1]);

        cache.put(4, &D);
        assert_eq!(cache.recency_keys(), vec![4, 2, 3]);
        assert_eq!(cache.get(1), None);
    }

    #[test]
    fn test_put_remove_get() {
        let mut cache = cache(3);

        cache.put(5, &E);
        cache.remove(5);

        assert_eq!(cache.get(5), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_repeated_get_is_stable() {
        let mut cache = cache(3);
        cache.put(1, &A);
        cache.put(2, &B);

        cache.get(1);
        let order = cache.recency_keys();
        cache.get(1);
        cache.get(1);

        assert_eq!(cache.recency_keys(), order);
        assert_eq!(cache.get(1), Some(A));
        assert_eq!(cache.get(2), Some(B));
    }

    #[test]
    fn test_colliding_keys_evict_independently() {
        // 1, 5, 9 share a bucket with the identity hasher and 4 buckets;
        // eviction order must follow recency, not chain position
        let mut cache = cache(2);

        cache.put(1, &A);
        cache.put(5, &B);
        cache.put(9, &C); // evicts 1

        assert_eq!(cache.get(1), None);
        assert_eq!(cache.get(5), Some(B));
        assert_eq!(cache.get(9), Some(C));
    }

    #[test]
    fn test_stats_counting() {
        let mut cache = cache(2);

        cache.put(1, &A);
        cache.put(2, &B);
        cache.get(1);
        cache.get(7);
        cache.put(3, &C);

        assert_eq!(cache.stats().inserts(), 3);
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 1);
        assert_eq!(cache.stats().evictions(), 1);
        assert_eq!(cache.stats().hit_ratio(), 0.5);

        cache.reset_stats();
        assert_eq!(cache.stats().hits(), 0);
    }

    #[test]
    fn test_dump_lists_recency_and_buckets() {
        let mut cache = cache(3);
        cache.put(1, &A);
        cache.put(2, &B);

        let dump = cache.dump();
        assert!(dump.contains("capacity=3, size=2"));
        assert!(dump.contains("recency: 2,1"));
        assert!(dump.contains("(1, 11223344...)"));
        assert!(dump.contains("(2, 55667788...)"));
    }

    #[test]
    fn test_default_hasher_smoke() {
        let mut cache: PageCache<8> = PageCache::new(16, 8).unwrap();

        for key in 0..64 {
            cache.put(key, &[key as u8; 8]);
        }
        assert_eq!(cache.len(), 16);

        // The 16 most recent keys survive
        for key in 48..64 {
            assert_eq!(cache.get(key), Some([key as u8; 8]));
        }
        for key in 0..48 {
            assert_eq!(cache.get(key), None);
        }
    }
}
