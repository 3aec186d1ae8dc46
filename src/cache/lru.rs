//! Thread-safe LRU cache over a fixed slot table.
//!
//! One mutex guards the slot table and the statistics together, so every
//! operation is serialized against every other one. All operations are O(1)
//! and do no I/O, which keeps the critical sections short.

use super::slots::{Insertion, SlotTable};
use super::CacheKey;
use crate::config::CacheOptions;
use crate::error::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statistics for cache performance monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Total number of cache lookups
    pub lookups: u64,
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of new entries
    pub insertions: u64,
    /// Number of in-place value updates
    pub updates: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Number of explicit deletions that found their key
    pub deletions: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }

    /// Reset all statistics to zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

struct Inner<K, V> {
    table: SlotTable<K, V>,
    stats: CacheStats,
}

impl<K: CacheKey, V> Inner<K, V> {
    fn lookup(&mut self, key: &K) -> Option<&V> {
        self.stats.lookups += 1;
        match self.table.get(key) {
            Some(value) => {
                self.stats.hits += 1;
                Some(value)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    fn insert(&mut self, key: K, value: V) -> Insertion<K, V> {
        let insertion = self.table.insert(key, value);
        match insertion {
            Insertion::Inserted => self.stats.insertions += 1,
            Insertion::Updated(_) => self.stats.updates += 1,
            Insertion::Evicted(..) => {
                self.stats.insertions += 1;
                self.stats.evictions += 1;
            }
        }
        insertion
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.table.remove(key);
        if removed.is_some() {
            self.stats.deletions += 1;
        }
        removed
    }
}

/// Thread-safe, fixed-capacity LRU cache.
///
/// Entries are stored in a slot array sized to `capacity` at construction;
/// inserting, updating, promoting, evicting and deleting entries only rewrites
/// slot indices and never allocates per entry. When the cache is full, a new
/// key replaces the least recently used entry.
///
/// # Thread Safety
///
/// Every operation takes the same lock for its whole duration. Share the
/// cache across threads with `Arc<BoundedLruCache<K, V>>`.
///
/// Values displaced by `set` and values removed by `delete` are dropped after
/// the lock is released. `clear` is the exception: it drops the cleared
/// values in place while holding the lock. `get` and `try_get` clone the
/// cached value while holding the lock.
pub struct BoundedLruCache<K, V> {
    name: String,
    capacity: usize,
    inner: Mutex<Inner<K, V>>,
}

impl<K: CacheKey, V> BoundedLruCache<K, V> {
    /// Create a new cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0. Use [`with_options`](Self::with_options)
    /// to get an error instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use slotlru::BoundedLruCache;
    ///
    /// let cache: BoundedLruCache<u64, String> = BoundedLruCache::new(128, "headers");
    /// assert!(cache.set(1, "genesis".to_string()));
    /// assert_eq!(cache.get(&1).as_deref(), Some("genesis"));
    /// ```
    pub fn new(capacity: usize, name: impl Into<String>) -> Self {
        match Self::with_options(CacheOptions::new(capacity).name(name)) {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }

    /// Create a new cache from options, validating them first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// the capacity is 0 or the lookup table hint exceeds the capacity.
    pub fn with_options(options: CacheOptions) -> Result<Self> {
        options.validate()?;

        let table = SlotTable::new(options.capacity, options.effective_table_size());
        log::debug!("{}: created LRU cache with capacity {}", options.name, options.capacity);

        Ok(Self {
            name: options.name,
            capacity: options.capacity,
            inner: Mutex::new(Inner { table, stats: CacheStats::default() }),
        })
    }

    /// Insert or update an entry, making it the most recently used.
    ///
    /// Returns `true` if a new entry was created, possibly evicting the least
    /// recently used one, and `false` if an existing entry was updated.
    pub fn set(&self, key: K, value: V) -> bool {
        let insertion = self.inner.lock().insert(key, value);
        match insertion {
            Insertion::Inserted => true,
            Insertion::Updated(_) => false,
            Insertion::Evicted(..) => {
                log::trace!("{}: evicted least recently used entry", self.name);
                true
            }
        }
    }

    /// Insert `Some(value)` like [`set`](Self::set), or delete the key when
    /// given `None`.
    ///
    /// With `None` the return value is that of [`delete`](Self::delete).
    pub fn set_or_delete(&self, key: K, value: Option<V>) -> bool {
        match value {
            Some(value) => self.set(key, value),
            None => self.delete(&key),
        }
    }

    /// Delete an entry. Returns `true` if the key was present.
    pub fn delete(&self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    /// Delete an entry and hand its value back.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Check whether a key is cached without changing its recency.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().table.contains(key)
    }

    /// Get the number of entries in the cache.
    pub fn count(&self) -> usize {
        self.inner.lock().table.len()
    }

    /// Same as [`count`](Self::count).
    pub fn len(&self) -> usize {
        self.count()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Get the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the cache name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remove all entries. Statistics are kept.
    pub fn clear(&self) {
        self.inner.lock().table.clear();
        log::debug!("{}: cleared", self.name);
    }

    /// Get current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats.clone()
    }

    /// Reset cache statistics to zero.
    pub fn reset_stats(&self) {
        self.inner.lock().stats.reset();
    }

    /// Snapshot of the cached keys, least recently used first.
    ///
    /// Allocates a new vector; meant for diagnostics and tests.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.inner.lock().table.keys_by_recency()
    }

    /// Check the internal slot table for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`](crate::Error::Corruption) describing the
    /// first broken invariant found.
    pub fn verify(&self) -> Result<()> {
        self.inner.lock().table.verify()
    }
}

impl<K: CacheKey, V: Clone> BoundedLruCache<K, V> {
    /// Get a value from the cache.
    ///
    /// Returns `Some(value)` on a hit and promotes the entry to most recently
    /// used. A miss returns `None` and changes nothing.
    ///
    /// `V::clone` runs while the lock is held. Wrap expensive or re-entrant
    /// values in an `Arc` so the clone is a reference count bump.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().lookup(key).cloned()
    }

    /// Get a value into `value`, returning whether the key was found.
    ///
    /// On a miss `value` is left untouched. On a hit the previous contents of
    /// `value` are dropped after the lock is released; only the clone of the
    /// cached value runs under the lock.
    pub fn try_get(&self, key: &K, value: &mut V) -> bool {
        // Assign after the guard is gone; dropping the old value runs its `Drop`.
        match self.get(key) {
            Some(found) => {
                *value = found;
                true
            }
            None => false,
        }
    }
}

impl<K: CacheKey, V: Clone + Default> BoundedLruCache<K, V> {
    /// Get a value, or `V::default()` on a miss.
    pub fn get_or_default(&self, key: &K) -> V {
        self.get(key).unwrap_or_default()
    }
}

impl<K, V> fmt::Debug for BoundedLruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedLruCache")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
