//! Entry arena with stable indices
//!
//! Entries live in a `Vec<Option<Entry>>`; freed slots are recycled through a
//! free list, so an index handed out for an entry stays valid for the entry's
//! whole lifetime. The hash index and the recency list both refer to entries
//! by slab index and never own them.

/// One live key/page pair.
///
/// Carries two independent link pairs: `hash_prev`/`hash_next` thread the
/// entry into its bucket's collision chain, `lru_prev`/`lru_next` thread it
/// into the global recency order. The pairs must never be conflated; mutating
/// one ordering leaves the other intact.
pub(crate) struct Entry<const P: usize> {
    pub key: u32,
    pub page: [u8; P],
    pub hash_prev: Option<usize>,
    pub hash_next: Option<usize>,
    pub lru_prev: Option<usize>,
    pub lru_next: Option<usize>,
}

/// Arena of cache entries with a free list for slot reuse
pub(crate) struct Slab<const P: usize> {
    slots: Vec<Option<Entry<P>>>,
    free: Vec<usize>,
    live: usize,
}

impl<const P: usize> Slab<P> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Allocate a slot for a new entry, copying the page in.
    ///
    /// All four links start unset; the index and recency list wire them up.
    pub fn alloc(&mut self, key: u32, page: &[u8; P]) -> usize {
        let entry = Entry {
            key,
            page: *page,
            hash_prev: None,
            hash_next: None,
            lru_prev: None,
            lru_next: None,
        };

        self.live += 1;
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(entry);
            idx
        } else {
            let idx = self.slots.len();
            self.slots.push(Some(entry));
            idx
        }
    }

    /// Free a slot, returning the entry that occupied it.
    pub fn free(&mut self, idx: usize) -> Option<Entry<P>> {
        let entry = self.slots[idx].take()?;
        self.free.push(idx);
        self.live -= 1;
        Some(entry)
    }

    pub fn slot(&self, idx: usize) -> Option<&Entry<P>> {
        self.slots.get(idx)?.as_ref()
    }

    pub fn slot_mut(&mut self, idx: usize) -> Option<&mut Entry<P>> {
        self.slots.get_mut(idx)?.as_mut()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.live
    }

    /// Drop every entry and forget all recycled slots
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}
