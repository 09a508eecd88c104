//! One bounded level of the cache chain
//!
//! A level binds an eviction-ordered store to a fixed capacity. Writes of new
//! keys into a full level evict first and hand the victim back to the caller,
//! so the store never holds more than `capacity` entries once a call returns.

use super::policy::{EvictionPolicy, EvictionPolicyKind};
use super::types::{level_name, Entry, LevelSnapshot};
use crate::config::{validate_capacity, ConfigError, ConfigResult};
use std::fmt;
use std::hash::Hash;

pub struct CacheLevel<K = String, V = String> {
    store: Box<dyn EvictionPolicy<K, V>>,
    capacity: usize,
    position: usize,
}

impl<K, V> CacheLevel<K, V>
where
    K: Hash + Eq + Clone + 'static,
    V: Clone + 'static,
{
    /// Build an empty level at `position` (0 = L1)
    pub fn new(position: usize, capacity: usize, policy: EvictionPolicyKind) -> ConfigResult<Self> {
        Self::with_store(position, capacity, policy.build(capacity))
    }

    /// Wrap a caller-supplied store, which must already fit in `capacity`
    pub fn with_store(
        position: usize,
        capacity: usize,
        store: Box<dyn EvictionPolicy<K, V>>,
    ) -> ConfigResult<Self> {
        validate_capacity(format!("capacities[{}]", position), capacity)?;
        if store.len() > capacity {
            return Err(ConfigError::Validation(format!(
                "{} store holds {} entries but capacity is {}",
                level_name(position),
                store.len(),
                capacity
            )));
        }

        Ok(Self {
            store,
            capacity,
            position,
        })
    }

    pub fn read(&mut self, key: &K) -> Option<&V> {
        self.store.get(key)
    }

    /// Insert or update; returns the entry evicted to make room, if any
    pub fn write(&mut self, key: K, value: V) -> Option<Entry<K, V>> {
        if self.store.contains(&key) {
            self.store.put(key, value);
            return None;
        }

        let evicted = self.make_room();
        self.store.put(key, value);
        evicted
    }

    /// Insert an entry relocated from another level; returns the entry evicted
    /// to make room, if any
    pub fn admit(&mut self, entry: Entry<K, V>) -> Option<Entry<K, V>> {
        let evicted = if self.store.contains(&entry.key) {
            None
        } else {
            self.make_room()
        };
        self.store.admit(entry);
        evicted
    }

    pub fn delete(&mut self, key: &K) -> bool {
        self.store.remove(key)
    }

    /// Remove a key and return its full entry
    pub fn take(&mut self, key: &K) -> Option<Entry<K, V>> {
        self.store.take(key)
    }

    fn make_room(&mut self) -> Option<Entry<K, V>> {
        if self.is_full() {
            self.store.evict_one()
        } else {
            None
        }
    }

    pub fn is_full(&self) -> bool {
        self.store.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.store.contains(key)
    }

    pub fn frequency_of(&self, key: &K) -> Option<u64> {
        self.store.frequency_of(key)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// `L1`, `L2`, ...
    pub fn name(&self) -> String {
        level_name(self.position)
    }

    pub fn policy(&self) -> EvictionPolicyKind {
        self.store.kind()
    }

    pub fn peek_eviction_candidate(&self) -> Option<&K> {
        self.store.peek_eviction_candidate()
    }

    pub fn evict_one(&mut self) -> Option<Entry<K, V>> {
        self.store.evict_one()
    }

    /// Entries in eviction order
    pub fn entries(&self) -> impl Iterator<Item = &Entry<K, V>> {
        self.store.entries()
    }

    pub fn snapshot(&self) -> LevelSnapshot<K, V> {
        LevelSnapshot {
            name: self.name(),
            capacity: self.capacity,
            entries: self.entries().cloned().collect(),
        }
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }
}

impl<K, V> fmt::Display for CacheLevel<K, V>
where
    K: Hash + Eq + Clone + fmt::Display + 'static,
    V: Clone + fmt::Display + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, entry) in self.entries().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", entry.key, entry.value)?;
        }
        write!(f, "}}")
    }
}

impl<K, V> fmt::Debug for CacheLevel<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheLevel")
            .field("position", &self.position)
            .field("capacity", &self.capacity)
            .field("len", &self.store.len())
            .field("policy", &self.store.kind())
            .finish()
    }
}
