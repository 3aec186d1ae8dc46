//! Fixed slot table with an index-linked recency list.
//!
//! All entries live in one boxed slice allocated at construction. Occupied
//! slots form a circular doubly-linked list threaded through `next`/`prev`
//! indices. `lru` anchors the list at the least recently used slot, and the
//! slot just before it (`slots[lru].prev`) is always the most recently used.
//! Vacant slots that were occupied before sit in the `free` stack.
//!
//! `SlotTable` does no locking of its own; `BoundedLruCache` wraps it in a
//! mutex.

use super::CacheKey;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::mem;

struct Entry<K, V> {
    key: K,
    value: V,
}

struct Slot<K, V> {
    entry: Option<Entry<K, V>>,
    next: usize,
    prev: usize,
}

impl<K, V> Slot<K, V> {
    fn vacant() -> Self {
        Self { entry: None, next: 0, prev: 0 }
    }
}

/// What `SlotTable::insert` did with the new entry.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Insertion<K, V> {
    /// A new entry took a fresh or recycled slot.
    Inserted,
    /// The key was present; carries the value it replaced.
    Updated(V),
    /// The table was full; carries the least recently used entry it evicted.
    Evicted(K, V),
}

pub(crate) struct SlotTable<K, V> {
    slots: Box<[Slot<K, V>]>,
    index: HashMap<K, usize>,
    free: Vec<usize>,
    /// Least recently used slot, `None` when the table is empty.
    lru: Option<usize>,
}

#[cold]
#[track_caller]
fn corrupt(msg: &str) -> ! {
    panic!("{}", Error::corruption(msg))
}

impl<K: CacheKey, V> SlotTable<K, V> {
    /// Allocates `capacity` vacant slots and a lookup table sized to `table_size`.
    pub(crate) fn new(capacity: usize, table_size: usize) -> Self {
        assert!(capacity >= 1, "slot table capacity must be >= 1");
        Self {
            slots: (0..capacity).map(|_| Slot::vacant()).collect::<Vec<_>>().into_boxed_slice(),
            index: HashMap::with_capacity(table_size),
            free: Vec::with_capacity(capacity),
            lru: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Looks up `key` and promotes it to most recently used.
    pub(crate) fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_most_recent(idx);
        Some(&self.entry(idx).value)
    }

    pub(crate) fn insert(&mut self, key: K, value: V) -> Insertion<K, V> {
        if let Some(&idx) = self.index.get(&key) {
            let old = mem::replace(&mut self.entry_mut(idx).value, value);
            self.move_to_most_recent(idx);
            return Insertion::Updated(old);
        }

        if self.index.len() >= self.slots.len() {
            let evicted = self.replace_lru(key, value);
            return Insertion::Evicted(evicted.key, evicted.value);
        }

        // With no recycled slot, slots [0, len) are all occupied.
        let idx = self.free.pop().unwrap_or(self.index.len());
        self.slots[idx].entry = Some(Entry { key, value });
        self.add_most_recent(idx);
        self.index.insert(key, idx);
        Insertion::Inserted
    }

    /// Unlinks `key` and returns its value, recycling the slot.
    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        self.unlink(idx);
        let entry =
            self.slots[idx].entry.take().unwrap_or_else(|| corrupt("indexed slot is vacant"));
        self.free.push(idx);
        Some(entry.value)
    }

    pub(crate) fn clear(&mut self) {
        self.lru = None;
        self.index.clear();
        self.free.clear();
        // Plain-data slots are simply overwritten on reuse.
        if mem::needs_drop::<Entry<K, V>>() {
            for slot in self.slots.iter_mut() {
                slot.entry = None;
            }
        }
    }

    /// Keys from least to most recently used.
    pub(crate) fn keys_by_recency(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.index.len());
        if let Some(start) = self.lru {
            let mut idx = start;
            loop {
                keys.push(self.entry(idx).key);
                idx = self.slots[idx].next;
                if idx == start || keys.len() > self.slots.len() {
                    break;
                }
            }
        }
        keys
    }

    #[cfg(test)]
    pub(crate) fn slot_of(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Checks every structural invariant of the table.
    pub(crate) fn verify(&self) -> Result<()> {
        let capacity = self.slots.len();
        let len = self.index.len();
        if len > capacity {
            return Err(Error::corruption(format!(
                "lookup table holds {} entries, capacity is {}",
                len, capacity
            )));
        }

        let mut seen = vec![false; capacity];
        match self.lru {
            None if len != 0 => {
                return Err(Error::corruption(format!(
                    "recency list is empty but {} keys are indexed",
                    len
                )));
            }
            None => {}
            Some(start) => {
                if start >= capacity {
                    return Err(Error::corruption(format!(
                        "recency pointer {} out of range",
                        start
                    )));
                }
                let mut idx = start;
                let mut walked = 0;
                loop {
                    if seen[idx] {
                        return Err(Error::corruption(format!("slot {} linked twice", idx)));
                    }
                    seen[idx] = true;
                    walked += 1;

                    let slot = &self.slots[idx];
                    let entry = slot.entry.as_ref().ok_or_else(|| {
                        Error::corruption(format!("linked slot {} is vacant", idx))
                    })?;
                    if self.index.get(&entry.key) != Some(&idx) {
                        return Err(Error::corruption(format!(
                            "slot {} is not indexed under its key",
                            idx
                        )));
                    }
                    if slot.next >= capacity {
                        return Err(Error::corruption(format!(
                            "slot {} links to out-of-range slot {}",
                            idx, slot.next
                        )));
                    }
                    if self.slots[slot.next].prev != idx {
                        return Err(Error::corruption(format!(
                            "slot {} does not link back to slot {}",
                            slot.next, idx
                        )));
                    }

                    idx = slot.next;
                    if idx == start {
                        break;
                    }
                }
                if walked != len {
                    return Err(Error::corruption(format!(
                        "recency list holds {} slots, lookup table holds {}",
                        walked, len
                    )));
                }
            }
        }

        for &idx in &self.free {
            if idx >= capacity {
                return Err(Error::corruption(format!("free slot {} out of range", idx)));
            }
            if seen[idx] {
                return Err(Error::corruption(format!(
                    "slot {} is both linked and free, or free twice",
                    idx
                )));
            }
            seen[idx] = true;
            if self.slots[idx].entry.is_some() {
                return Err(Error::corruption(format!("free slot {} still holds an entry", idx)));
            }
        }

        Ok(())
    }

    fn entry(&self, idx: usize) -> &Entry<K, V> {
        self.slots[idx].entry.as_ref().unwrap_or_else(|| corrupt("linked slot is vacant"))
    }

    fn entry_mut(&mut self, idx: usize) -> &mut Entry<K, V> {
        self.slots[idx].entry.as_mut().unwrap_or_else(|| corrupt("linked slot is vacant"))
    }

    /// Overwrites the least recently used slot in place and makes it the most
    /// recently used one. Returns the entry that was there.
    fn replace_lru(&mut self, key: K, value: V) -> Entry<K, V> {
        let Some(idx) = self.lru else {
            corrupt("eviction requested on an empty recency list");
        };
        let old = self.slots[idx]
            .entry
            .replace(Entry { key, value })
            .unwrap_or_else(|| corrupt("recency pointer references a vacant slot"));
        self.index.remove(&old.key);
        self.move_to_most_recent(idx);
        self.index.insert(key, idx);
        old
    }

    fn move_to_most_recent(&mut self, idx: usize) {
        if self.slots[idx].next == idx {
            // Sole node; it is both oldest and newest.
            if self.lru != Some(idx) {
                corrupt("single-node list is not anchored at the recency pointer");
            }
            return;
        }
        self.unlink(idx);
        self.add_most_recent(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let Some(lru) = self.lru else {
            corrupt("unlink called on an empty recency list");
        };
        let (next, prev) = (self.slots[idx].next, self.slots[idx].prev);
        if next == idx {
            if lru != idx {
                corrupt("single-node list is not anchored at the recency pointer");
            }
            self.lru = None;
        } else {
            self.slots[next].prev = prev;
            self.slots[prev].next = next;
            if lru == idx {
                self.lru = Some(next);
            }
        }
    }

    fn add_most_recent(&mut self, idx: usize) {
        match self.lru {
            None => {
                self.slots[idx].next = idx;
                self.slots[idx].prev = idx;
                self.lru = Some(idx);
            }
            Some(oldest) => {
                // Splice in between the newest slot and the oldest one.
                let newest = self.slots[oldest].prev;
                self.slots[idx].next = oldest;
                self.slots[idx].prev = newest;
                self.slots[newest].next = idx;
                self.slots[oldest].prev = idx;
            }
        }
    }
}
