//! Single-queue stores for LRU and FIFO
//!
//! Both sit on an unbounded `lru::LruCache`; its least-recently-used end is the
//! next victim. Recency order promotes on access, insertion order only peeks,
//! so an entry keeps the place it got when it arrived.

use super::policy::{EvictionPolicy, EvictionPolicyKind};
use super::types::Entry;
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOrder {
    /// Accesses move the entry to the tail (LRU)
    Recency,
    /// Arrival order is fixed (FIFO)
    Insertion,
}

pub struct ListOrderedStore<K, V> {
    cache: LruCache<K, Entry<K, V>, FxBuildHasher>,
    order: AccessOrder,
    next_sequence: u64,
}

impl<K: Hash + Eq + Clone, V> ListOrderedStore<K, V> {
    /// Capacity is enforced by the owning level, never by the queue itself
    pub fn new(order: AccessOrder, _capacity: usize) -> Self {
        Self {
            cache: LruCache::unbounded_with_hasher(FxBuildHasher),
            order,
            next_sequence: 0,
        }
    }

    pub fn recency(capacity: usize) -> Self {
        Self::new(AccessOrder::Recency, capacity)
    }

    pub fn insertion(capacity: usize) -> Self {
        Self::new(AccessOrder::Insertion, capacity)
    }

    pub fn order(&self) -> AccessOrder {
        self.order
    }

    /// Count an access, reordering only under recency order
    fn touch(&mut self, key: &K) -> Option<&mut Entry<K, V>> {
        let entry = match self.order {
            AccessOrder::Recency => self.cache.get_mut(key)?,
            AccessOrder::Insertion => self.cache.peek_mut(key)?,
        };
        entry.frequency += 1;
        Some(entry)
    }
}

impl<K: Hash + Eq + Clone, V> EvictionPolicy<K, V> for ListOrderedStore<K, V> {
    fn get(&mut self, key: &K) -> Option<&V> {
        self.touch(key).map(|entry| &entry.value)
    }

    fn put(&mut self, key: K, value: V) {
        if let Some(entry) = self.touch(&key) {
            entry.value = value;
            return;
        }

        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        self.cache.put(key.clone(), Entry::new(key, value, sequence));
    }

    fn admit(&mut self, entry: Entry<K, V>) {
        self.cache.pop(&entry.key);
        self.next_sequence = self.next_sequence.max(entry.sequence.saturating_add(1));
        self.cache.put(entry.key.clone(), entry);
    }

    fn take(&mut self, key: &K) -> Option<Entry<K, V>> {
        self.cache.pop(key)
    }

    fn peek_eviction_candidate(&self) -> Option<&K> {
        self.cache.peek_lru().map(|(key, _)| key)
    }

    fn evict_one(&mut self) -> Option<Entry<K, V>> {
        self.cache.pop_lru().map(|(_, entry)| entry)
    }

    fn contains(&self, key: &K) -> bool {
        self.cache.contains(key)
    }

    fn frequency_of(&self, key: &K) -> Option<u64> {
        self.cache.peek(key).map(|entry| entry.frequency)
    }

    fn len(&self) -> usize {
        self.cache.len()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = &Entry<K, V>> + '_> {
        Box::new(self.cache.iter().rev().map(|(_, entry)| entry))
    }

    fn clear(&mut self) {
        self.cache.clear();
    }

    fn kind(&self) -> EvictionPolicyKind {
        match self.order {
            AccessOrder::Recency => EvictionPolicyKind::Lru,
            AccessOrder::Insertion => EvictionPolicyKind::Fifo,
        }
    }
}
