//! # slotlru - A Fixed-Capacity Slot-Array LRU Cache
//!
//! slotlru provides a bounded Least-Recently-Used cache for fixed-size keys.
//! Capacity is fixed when the cache is built, and all storage is allocated
//! up front. Entries live in a contiguous slot array and the recency order is
//! an intrusive circular list threaded through slot indices, so lookups,
//! updates, promotions, evictions and deletions are O(1) pointer rewrites
//! with no per-entry allocation.
//!
//! ## Architecture
//!
//! - **Slot table**: the slot array, a key to slot index lookup table, a free
//!   slot stack and the recency list anchored at the least recently used slot
//! - **BoundedLruCache**: the slot table behind a single mutex, plus hit/miss
//!   statistics
//! - **CacheOptions**: capacity, name and lookup table sizing
//!
//! ## Example Usage
//!
//! ```rust
//! use slotlru::{BoundedLruCache, CacheOptions};
//!
//! # fn main() -> Result<(), slotlru::Error> {
//! let cache: BoundedLruCache<[u8; 32], u64> =
//!     BoundedLruCache::with_options(CacheOptions::new(2).name("block-numbers"))?;
//!
//! cache.set([1; 32], 1);
//! cache.set([2; 32], 2);
//!
//! // Reading a key makes it the most recently used
//! assert_eq!(cache.get(&[1; 32]), Some(1));
//!
//! // The cache is full, so the least recently used key is evicted
//! cache.set([3; 32], 3);
//! assert!(!cache.contains(&[2; 32]));
//! assert!(cache.contains(&[1; 32]));
//!
//! cache.delete(&[1; 32]);
//! assert_eq!(cache.count(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Module declarations
pub mod cache;
pub mod config;
pub mod error;

// Re-exports
pub use cache::{BoundedLruCache, CacheKey, CacheStats};
pub use config::CacheOptions;
pub use error::{Error, Result};
