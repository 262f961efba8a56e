use alloc::collections::VecDeque;

use crate::key::{CacheKey, KeyMap};

/// A fixed-capacity map that evicts its oldest entry first.
///
/// Age is insertion order: replacing the value of an existing key does not make it younger,
/// and reads never reorder entries. Meant for memoizing small derived values (for example
/// resolved style variants) without a process-wide global.
#[derive(Clone, Debug)]
pub struct BoundedCache<K, V> {
    map: KeyMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: CacheKey, V> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            map: KeyMap::new(),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    /// Inserts or replaces `key`.
    ///
    /// Returns the entry pushed out to make room. With a capacity of `0` nothing is stored and
    /// the new entry itself is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.capacity == 0 {
            return Some((key, value));
        }
        if let Some(slot) = self.map.get_mut(&key) {
            *slot = value;
            return None;
        }

        let mut evicted = None;
        if self.map.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                evicted = self.map.remove(&oldest).map(|v| (oldest, v));
                wtrace!(capacity = self.capacity, "BoundedCache: evicted oldest entry");
            }
        }
        self.order.push_back(key.clone());
        self.map.insert(key, value);
        evicted
    }

    /// Returns the cached value for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with(&mut self, key: K, f: impl FnOnce() -> V) -> V
    where
        V: Clone,
    {
        if let Some(v) = self.map.get(&key) {
            return v.clone();
        }
        let value = f();
        self.insert(key, value.clone());
        value
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.map.remove(key)?;
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        Some(value)
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}
