//! Bounded LRU cache implementation.
//!
//! Provides a fixed-capacity LRU (Least Recently Used) cache whose entries
//! live in a slot array allocated once at construction. Callers use it to
//! avoid repeating expensive decode or lookup work for keys they have
//! already seen.

mod lru;
mod slots;

use std::hash::Hash;

pub use lru::{BoundedLruCache, CacheStats};

/// A fixed-size key that can be stored inline in a cache slot.
///
/// Implemented for every `Copy + Eq + Hash` type, such as integers, byte
/// arrays like `[u8; 32]`, or small `Copy` structs. `Copy` keeps heap-owning
/// types like `String` out, so a slot never points at a separately
/// allocated key.
pub trait CacheKey: Copy + Eq + Hash {}

impl<T: Copy + Eq + Hash> CacheKey for T {}
