//! Shared cache handle
//!
//! The core `PageCache` is single-threaded by design. Callers that need the
//! cache from more than one place serialize through one exclusive lock around
//! the whole controller; this module packages that pattern as a cloneable
//! handle.

use std::hash::BuildHasher;
use std::sync::Arc;

use ahash::RandomState;
use parking_lot::Mutex;

use crate::cache::PageCache;
use crate::error::Result;
use crate::stats::CacheStats;

/// Cloneable handle to a `PageCache` behind a single exclusive lock.
///
/// Every operation, including `get`, reorders recency, so there is no
/// read-only path to expose; a plain mutex is the whole story.
pub struct SharedPageCache<const P: usize, S = RandomState> {
    inner: Arc<Mutex<PageCache<P, S>>>,
}

impl<const P: usize, S> Clone for SharedPageCache<P, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<const P: usize> SharedPageCache<P> {
    /// Create a shared cache with the default hasher.
    pub fn new(capacity: usize, bucket_count: usize) -> Result<Self> {
        Ok(Self::from_cache(PageCache::new(capacity, bucket_count)?))
    }
}

impl<const P: usize, S: BuildHasher> SharedPageCache<P, S> {
    /// Wrap an already-constructed cache.
    pub fn from_cache(cache: PageCache<P, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Look up a page, promoting it on a hit.
    pub fn get(&self, key: u32) -> Option<[u8; P]> {
        self.inner.lock().get(key)
    }

    /// Insert or overwrite a page.
    pub fn put(&self, key: u32, page: &[u8; P]) {
        self.inner.lock().put(key, page);
    }

    /// Remove a page, returning a copy of it.
    pub fn remove(&self, key: u32) -> Option<[u8; P]> {
        self.inner.lock().remove(key)
    }

    /// Drop every entry and reset the statistics.
    pub fn clear(&self) {
        let mut cache = self.inner.lock();
        cache.clear();
        cache.reset_stats();
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Snapshot of the statistics counters
    pub fn stats(&self) -> CacheStats {
        *self.inner.lock().stats()
    }

    /// Human-readable dump of the cache contents (debugging aid)
    pub fn dump(&self) -> String {
        self.inner.lock().dump()
    }
}
