//! Bucketed hash index
//!
//! A fixed array of bucket heads; each bucket holds a doubly-linked chain of
//! entries threaded through the slab's hash links. The bucket for a key is
//! `hash(key) mod bucket_count`, and the bucket count never changes: there
//! is no rehashing or resizing for the cache's lifetime.

use std::hash::BuildHasher;

use crate::slab::Slab;

/// Hash index mapping keys to slab slots via fixed bucket chains
pub(crate) struct HashIndex<S> {
    buckets: Vec<Option<usize>>,
    state: S,
}

impl<S: BuildHasher> HashIndex<S> {
    pub fn new(bucket_count: usize, state: S) -> Self {
        Self {
            buckets: vec![None; bucket_count],
            state,
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn bucket_head(&self, bucket: usize) -> Option<usize> {
        self.buckets[bucket]
    }

    pub fn bucket_of(&self, key: u32) -> usize {
        (self.state.hash_one(key) % self.buckets.len() as u64) as usize
    }

    /// Walk the key's bucket chain and return its slot, if present.
    ///
    /// Purely a lookup: the chain is left exactly as found. Recency is the
    /// controller's concern, not the index's.
    pub fn find<const P: usize>(&self, slab: &Slab<P>, key: u32) -> Option<usize> {
        let mut cur = self.buckets[self.bucket_of(key)];
        while let Some(idx) = cur {
            let entry = slab.slot(idx)?;
            if entry.key == key {
                return Some(idx);
            }
            cur = entry.hash_next;
        }
        None
    }

    /// Allocate a slot for a key known to be absent and link it at the head
    /// of its bucket chain. Chain position carries no meaning beyond
    /// collision resolution.
    pub fn insert_new<const P: usize>(
        &mut self,
        slab: &mut Slab<P>,
        key: u32,
        page: &[u8; P],
    ) -> usize {
        let bucket = self.bucket_of(key);
        let idx = slab.alloc(key, page);

        let head = self.buckets[bucket];
        if let Some(entry) = slab.slot_mut(idx) {
            entry.hash_next = head;
        }
        if let Some(head_idx) = head {
            if let Some(head_entry) = slab.slot_mut(head_idx) {
                head_entry.hash_prev = Some(idx);
            }
        }
        self.buckets[bucket] = Some(idx);
        idx
    }

    /// Detach a slot from its bucket chain. The slot itself stays allocated;
    /// the controller frees it once the recency list has let go too.
    pub fn unlink<const P: usize>(&mut self, slab: &mut Slab<P>, idx: usize) {
        let (key, prev, next) = match slab.slot(idx) {
            Some(entry) => (entry.key, entry.hash_prev, entry.hash_next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_entry) = slab.slot_mut(prev_idx) {
                    prev_entry.hash_next = next;
                }
            }
            None => {
                let bucket = self.bucket_of(key);
                self.buckets[bucket] = next;
            }
        }

        if let Some(next_idx) = next {
            if let Some(next_entry) = slab.slot_mut(next_idx) {
                next_entry.hash_prev = prev;
            }
        }

        if let Some(entry) = slab.slot_mut(idx) {
            entry.hash_prev = None;
            entry.hash_next = None;
        }
    }

    /// Restore every bucket to empty. Entry slots are the slab's to reclaim.
    pub fn reset(&mut self) {
        self.buckets.fill(None);
    }
}
