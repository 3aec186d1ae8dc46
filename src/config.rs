//! Configuration options for building a cache.

/// Configuration options for a [`BoundedLruCache`](crate::BoundedLruCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    /// Maximum number of entries. The slot array is allocated to exactly this
    /// many slots up front.
    /// Default: 1024
    pub capacity: usize,

    /// Name used in log lines, `Debug` output and panic messages.
    /// Default: "lru"
    pub name: String,

    /// Initial capacity of the key lookup table.
    /// The table can still grow up to `capacity` entries.
    /// Default: None (half of `capacity`, at least 1)
    pub table_size_hint: Option<usize>,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { capacity: 1024, name: "lru".to_string(), table_size_hint: None }
    }
}

impl CacheOptions {
    /// Creates options for a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self { capacity, ..Self::default() }
    }

    /// Sets the maximum number of entries.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the cache name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the initial lookup table size.
    pub fn table_size_hint(mut self, hint: usize) -> Self {
        self.table_size_hint = Some(hint);
        self
    }

    /// Initial lookup table size after applying the default.
    pub fn effective_table_size(&self) -> usize {
        self.table_size_hint.unwrap_or((self.capacity / 2).max(1))
    }

    /// Validates the options and returns an error if any are invalid.
    pub fn validate(&self) -> crate::Result<()> {
        if self.capacity < 1 {
            return Err(crate::Error::invalid_argument(format!(
                "{}: capacity must be >= 1, got {}",
                self.name, self.capacity
            )));
        }
        if let Some(hint) = self.table_size_hint {
            if hint > self.capacity {
                return Err(crate::Error::invalid_argument(format!(
                    "{}: table_size_hint ({}) must not exceed capacity ({})",
                    self.name, hint, self.capacity
                )));
            }
        }
        Ok(())
    }
}
