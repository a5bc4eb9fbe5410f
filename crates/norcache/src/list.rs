//! Recency list
//!
//! Intrusive doubly-linked list over slab indices ordering every live entry
//! from most- to least-recently-used. Links live on the entries themselves
//! (`lru_prev`/`lru_next`), so every operation is O(1) once a slot index is
//! known; no traversal ever happens here.

use crate::slab::Slab;

/// Total recency order over live entries: head = MRU, tail = LRU
pub(crate) struct RecencyList {
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl RecencyList {
    pub fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn head(&self) -> Option<usize> {
        self.head
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Insert a freshly allocated entry at the MRU end. Called exactly once
    /// per entry, right after allocation.
    pub fn push_front<const P: usize>(&mut self, slab: &mut Slab<P>, idx: usize) {
        if let Some(entry) = slab.slot_mut(idx) {
            entry.lru_prev = None;
            entry.lru_next = self.head;
        }
        if let Some(head_idx) = self.head {
            if let Some(head_entry) = slab.slot_mut(head_idx) {
                head_entry.lru_prev = Some(idx);
            }
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
        self.len += 1;
    }

    /// Promote an entry to the MRU end. No-op if it is already there.
    pub fn move_to_front<const P: usize>(&mut self, slab: &mut Slab<P>, idx: usize) {
        if self.head == Some(idx) {
            return;
        }

        self.detach(slab, idx);

        if let Some(entry) = slab.slot_mut(idx) {
            entry.lru_next = self.head;
        }
        if let Some(head_idx) = self.head {
            if let Some(head_entry) = slab.slot_mut(head_idx) {
                head_entry.lru_prev = Some(idx);
            }
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    /// Remove and return the LRU entry's slot, or `None` if empty.
    pub fn pop_back<const P: usize>(&mut self, slab: &mut Slab<P>) -> Option<usize> {
        let tail_idx = self.tail?;
        self.detach(slab, tail_idx);
        self.len -= 1;
        Some(tail_idx)
    }

    /// Remove an entry from wherever it sits in the order.
    pub fn remove<const P: usize>(&mut self, slab: &mut Slab<P>, idx: usize) {
        self.detach(slab, idx);
        self.len -= 1;
    }

    pub fn clear(&mut self) {
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Unhook `idx` from its neighbors and the head/tail bookkeeping,
    /// leaving its own links cleared. Does not touch `len`.
    fn detach<const P: usize>(&mut self, slab: &mut Slab<P>, idx: usize) {
        let (prev, next) = match slab.slot(idx) {
            Some(entry) => (entry.lru_prev, entry.lru_next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_entry) = slab.slot_mut(prev_idx) {
                    prev_entry.lru_next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_entry) = slab.slot_mut(next_idx) {
                    next_entry.lru_prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }

        if let Some(entry) = slab.slot_mut(idx) {
            entry.lru_prev = None;
            entry.lru_next = None;
        }
    }
}
