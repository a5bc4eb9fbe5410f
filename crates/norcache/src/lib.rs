//! # norcache
//!
//! Fixed-capacity LRU cache for fixed-size pages, built for hosts that page
//! NOR-flash/ROM data on demand (e.g. a pocket-computer emulator paging
//! 512-byte flash pages).
//!
//! ## Architecture
//! - **Hash index**: fixed bucket array, chains resolved with AHash (O(1)
//!   expected lookup, no rehashing ever)
//! - **Recency list**: intrusive doubly-linked order over an entry arena for
//!   O(1) promotion and eviction
//! - **Controller**: [`PageCache`] enforces the capacity bound and keeps both
//!   structures consistent; each entry carries separate links for its bucket
//!   chain and its recency position
//!
//! Pages are copied in and out by value; the cache never lends out its own
//! buffers. For use from multiple contexts, [`SharedPageCache`] wraps the
//! controller in one exclusive lock.

#![warn(missing_docs)]

mod cache;
mod error;
mod index;
mod list;
mod shared;
mod slab;
mod stats;

pub use cache::PageCache;
pub use error::{Error, Result};
pub use shared::SharedPageCache;
pub use stats::CacheStats;

/// Page size of the NOR flash the original host pages in and out
pub const NOR_PAGE_SIZE: usize = 512;
