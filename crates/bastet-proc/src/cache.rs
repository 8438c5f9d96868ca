//! A small bounded LRU cache for memoized gate models.
//!
//! Custom processors evaluate user-supplied closures per (gate parameters,
//! backend parameters) pair; the same pair recurs for every occurrence of a
//! gate in a circuit, so each model keeps a fixed-capacity cache. Eviction
//! is least-recently-used.

use std::collections::VecDeque;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Hit/miss/eviction counters of one model cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: u64,
    /// Number of lookups that required evaluating the model.
    pub misses: u64,
    /// Number of entries evicted to make room.
    pub evictions: u64,
    /// Entries currently held.
    pub len: usize,
    /// Maximum number of entries.
    pub capacity: usize,
}

/// Fixed-capacity map with least-recently-used eviction.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    capacity: usize,
    map: FxHashMap<K, V>,
    // Most recently used at the back.
    order: VecDeque<K>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K: Eq + Hash + Clone, V: Clone> BoundedCache<K, V> {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            map: FxHashMap::default(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up a key, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.map.get(key) {
            Some(value) => {
                self.hits += 1;
                let value = value.clone();
                if let Some(pos) = self.order.iter().position(|k| k == key) {
                    self.order.remove(pos);
                }
                self.order.push_back(key.clone());
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert a value, evicting the least recently used entry when full.
    pub fn insert(&mut self, key: K, value: V) {
        if self.map.contains_key(&key) {
            self.map.insert(key, value);
            return;
        }
        if self.map.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
                self.evictions += 1;
            }
        }
        self.order.push_back(key.clone());
        self.map.insert(key, value);
    }

    /// Drop every entry; counters are kept.
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            len: self.map.len(),
            capacity: self.capacity,
        }
    }
}
