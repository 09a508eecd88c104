//! Frequency-ordered store (LFU)
//!
//! Layout:
//! - `arena`: every entry, addressed by slot id
//! - `index`: key -> slot id
//! - `tiers`: frequency -> list of slot ids in order of arrival in that tier
//! - `min_frequency`: lowest non-empty tier, so the eviction candidate is the
//!   head of `tiers[min_frequency]`
//!
//! An access moves the entry from tier `f` to the tail of tier `f + 1`, so it
//! loses tie-break priority to entries already at `f + 1`. For entries that
//! were never touched, arrival order in tier 1 is insertion (sequence) order.
//!
//! Tiers are kept in a `BTreeMap`, so when the lowest tier empties the next
//! minimum is its first key. Every operation is O(log T) in the number of
//! distinct frequencies; the eviction candidate itself is read in O(1).

use super::arena::{SlotArena, SlotId, SlotList};
use super::policy::{EvictionPolicy, EvictionPolicyKind};
use super::types::Entry;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::hash::Hash;

pub struct FrequencyOrderedStore<K, V> {
    arena: SlotArena<K, V>,
    index: FxHashMap<K, SlotId>,
    tiers: BTreeMap<u64, SlotList>,
    /// 0 while the store is empty
    min_frequency: u64,
    next_sequence: u64,
}

impl<K: Hash + Eq + Clone, V> FrequencyOrderedStore<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            tiers: BTreeMap::new(),
            min_frequency: 0,
            next_sequence: 0,
        }
    }

    /// Lowest frequency currently held, if any
    pub fn min_frequency(&self) -> Option<u64> {
        (!self.index.is_empty()).then_some(self.min_frequency)
    }

    /// Number of distinct frequency tiers
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    fn link(&mut self, id: SlotId, frequency: u64) {
        if self.tiers.is_empty() || frequency < self.min_frequency {
            self.min_frequency = frequency;
        }
        let tier = self.tiers.entry(frequency).or_default();
        self.arena.push_back(tier, id);
    }

    /// Returns true when the tier became empty and was pruned
    fn unlink(&mut self, id: SlotId, frequency: u64) -> bool {
        let emptied = match self.tiers.get_mut(&frequency) {
            Some(tier) => {
                self.arena.unlink(tier, id);
                tier.is_empty()
            }
            None => return false,
        };
        if emptied {
            self.tiers.remove(&frequency);
        }
        emptied
    }

    fn touch(&mut self, id: SlotId) {
        let Some(entry) = self.arena.get_mut(id) else {
            return;
        };
        let frequency = entry.frequency;
        entry.frequency += 1;

        if self.unlink(id, frequency) && frequency == self.min_frequency {
            // The entry itself lands in the next tier, so that tier is the new minimum
            self.min_frequency = frequency + 1;
        }
        self.link(id, frequency + 1);
    }

    fn insert_entry(&mut self, entry: Entry<K, V>) {
        let key = entry.key.clone();
        let frequency = entry.frequency;
        let id = self.arena.insert(entry);
        self.index.insert(key, id);
        self.link(id, frequency);
    }

    fn detach(&mut self, id: SlotId) -> Option<Entry<K, V>> {
        let frequency = self.arena.get(id)?.frequency;
        let emptied = self.unlink(id, frequency);
        let entry = self.arena.remove(id)?;
        self.index.remove(&entry.key);

        if emptied && frequency == self.min_frequency {
            self.min_frequency = self
                .tiers
                .first_key_value()
                .map_or(0, |(&lowest, _)| lowest);
        }
        Some(entry)
    }
}

impl<K: Hash + Eq + Clone, V> Default for FrequencyOrderedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone, V> EvictionPolicy<K, V> for FrequencyOrderedStore<K, V> {
    fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.touch(id);
        self.arena.get(id).map(|entry| &entry.value)
    }

    fn put(&mut self, key: K, value: V) {
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.arena.get_mut(id) {
                entry.value = value;
            }
            self.touch(id);
            return;
        }

        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        self.insert_entry(Entry::new(key, value, sequence));
    }

    fn admit(&mut self, entry: Entry<K, V>) {
        if let Some(&id) = self.index.get(&entry.key) {
            self.detach(id);
        }
        // Keep fresh sequences above anything this store has seen
        self.next_sequence = self.next_sequence.max(entry.sequence.saturating_add(1));
        let frequency = entry.frequency;
        self.insert_entry(entry.with_frequency(frequency));
    }

    fn take(&mut self, key: &K) -> Option<Entry<K, V>> {
        let id = *self.index.get(key)?;
        self.detach(id)
    }

    fn peek_eviction_candidate(&self) -> Option<&K> {
        let id = self.tiers.get(&self.min_frequency)?.head()?;
        self.arena.get(id).map(|entry| &entry.key)
    }

    fn evict_one(&mut self) -> Option<Entry<K, V>> {
        let id = self.tiers.get(&self.min_frequency)?.head()?;
        self.detach(id)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn frequency_of(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.arena.get(id).map(|entry| entry.frequency)
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = &Entry<K, V>> + '_> {
        Box::new(
            self.tiers
                .values()
                .flat_map(move |tier| self.arena.iter(tier)),
        )
    }

    fn clear(&mut self) {
        self.arena.clear();
        self.index.clear();
        self.tiers.clear();
        self.min_frequency = 0;
    }

    fn kind(&self) -> EvictionPolicyKind {
        EvictionPolicyKind::Lfu
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn order(store: &FrequencyOrderedStore<&'static str, u32>) -> Vec<&'static str> {
        store.entries().map(|entry| entry.key).collect()
    }

    #[test]
    fn test_put_and_get() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);

        assert_eq!(store.get(&"a"), Some(&1));
        assert_eq!(store.frequency_of(&"a"), Some(2));
        assert_eq!(store.len(), 1);
        assert!(store.contains(&"a"));
    }

    #[test]
    fn test_get_miss_has_no_side_effects() {
        let mut store: FrequencyOrderedStore<&str, u32> = FrequencyOrderedStore::new();
        store.put("a", 1);

        assert_eq!(store.get(&"zzz"), None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.frequency_of(&"a"), Some(1));
    }

    #[test]
    fn test_fresh_entries_get_monotonic_sequences() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);
        store.put("b", 2);
        store.put("c", 3);

        let sequences: Vec<u64> = store.entries().map(|entry| entry.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
    }

    #[test]
    fn test_put_existing_updates_value_and_frequency() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);
        store.put("a", 10);

        assert_eq!(store.len(), 1);
        assert_eq!(store.frequency_of(&"a"), Some(2));
        assert_eq!(store.take(&"a").unwrap().value, 10);
    }

    #[test]
    fn test_tie_break_is_insertion_order() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);
        store.put("b", 2);
        store.put("c", 3);

        assert_eq!(store.peek_eviction_candidate(), Some(&"a"));
        assert_eq!(store.evict_one().unwrap().key, "a");
        assert_eq!(store.evict_one().unwrap().key, "b");
        assert_eq!(store.evict_one().unwrap().key, "c");
        assert!(store.evict_one().is_none());
    }

    #[test]
    fn test_lowest_frequency_evicted_first() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);
        store.put("b", 2);
        store.get(&"a");

        assert_eq!(store.peek_eviction_candidate(), Some(&"b"));
        assert_eq!(order(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_access_moves_to_tail_of_next_tier() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);
        store.put("b", 2);
        store.get(&"b");
        store.get(&"a");

        // Both at frequency 2; b arrived in that tier first
        assert_eq!(order(&store), vec!["b", "a"]);
        assert_eq!(store.evict_one().unwrap().key, "b");
    }

    #[test]
    fn test_min_frequency_tracks_touches() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);
        assert_eq!(store.min_frequency(), Some(1));

        store.get(&"a");
        store.get(&"a");
        assert_eq!(store.min_frequency(), Some(3));
        assert_eq!(store.tier_count(), 1);

        store.put("b", 2);
        assert_eq!(store.min_frequency(), Some(1));
        assert_eq!(store.tier_count(), 2);
    }

    #[test]
    fn test_min_frequency_recomputed_after_removal() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);
        store.put("b", 2);
        store.get(&"b");
        store.get(&"b");
        store.put("c", 3);
        store.get(&"c");

        assert!(store.remove(&"a"));
        assert_eq!(store.min_frequency(), Some(2));
        assert_eq!(store.peek_eviction_candidate(), Some(&"c"));

        assert!(store.remove(&"c"));
        assert_eq!(store.min_frequency(), Some(3));
        assert_eq!(store.peek_eviction_candidate(), Some(&"b"));

        assert!(store.remove(&"b"));
        assert_eq!(store.min_frequency(), None);
        assert_eq!(store.peek_eviction_candidate(), None);
        assert_eq!(store.tier_count(), 0);
    }

    #[test]
    fn test_min_frequency_after_evicting_across_sparse_tiers() {
        let mut store = FrequencyOrderedStore::new();
        for (key, frequency) in [("d", 999), ("a", 1), ("c", 400), ("b", 50)] {
            store.admit(Entry::new(key, 0, 0).with_frequency(frequency));
        }
        assert_eq!(store.tier_count(), 4);

        let mut evicted = Vec::new();
        let mut minimums = Vec::new();
        while let Some(entry) = store.evict_one() {
            evicted.push(entry.key);
            minimums.push(store.min_frequency());
        }

        assert_eq!(evicted, vec!["a", "b", "c", "d"]);
        assert_eq!(minimums, vec![Some(50), Some(400), Some(999), None]);
    }

    #[test]
    fn test_evict_then_insert_resets_minimum() {
        let mut store = FrequencyOrderedStore::new();
        for frequency in 1..=200u64 {
            store.admit(Entry::new(frequency as u32, 0, frequency).with_frequency(frequency));
        }

        // Steady state of a full level taking fresh writes
        for key in 1000..1100u32 {
            let victim = store.evict_one().unwrap();
            assert_eq!(victim.frequency, 1);
            store.put(key, 0);
            assert_eq!(store.min_frequency(), Some(1));
        }
        assert_eq!(store.len(), 200);
        assert_eq!(store.tier_count(), 200);
    }

    #[test]
    fn test_admit_max_sequence_saturates() {
        let mut store = FrequencyOrderedStore::new();
        store.admit(Entry::new("x", 1, u64::MAX));
        store.put("a", 2);
        store.put("b", 3);

        assert_eq!(store.take(&"a").unwrap().sequence, u64::MAX);
        assert_eq!(store.take(&"b").unwrap().sequence, u64::MAX);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);

        assert!(store.remove(&"a"));
        assert!(!store.remove(&"a"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_admit_keeps_frequency_and_sequence() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);
        store.admit(Entry::new("x", 9, 41).with_frequency(3));

        assert_eq!(store.frequency_of(&"x"), Some(3));
        assert_eq!(order(&store), vec!["a", "x"]);

        // Fresh writes keep sequences ahead of admitted entries
        store.put("b", 2);
        let b = store.take(&"b").unwrap();
        assert_eq!(b.sequence, 42);
    }

    #[test]
    fn test_admit_lands_at_tail_of_its_tier() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);
        store.get(&"a");
        store.admit(Entry::new("x", 9, 0).with_frequency(2));

        assert_eq!(order(&store), vec!["a", "x"]);
    }

    #[test]
    fn test_admit_below_current_minimum() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);
        store.get(&"a");
        store.get(&"a");
        store.admit(Entry::new("x", 9, 5));

        assert_eq!(store.min_frequency(), Some(1));
        assert_eq!(store.peek_eviction_candidate(), Some(&"x"));
    }

    #[test]
    fn test_admit_existing_key_replaces_entry() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);
        store.admit(Entry::new("a", 7, 3).with_frequency(4));

        assert_eq!(store.len(), 1);
        assert_eq!(store.frequency_of(&"a"), Some(4));
        assert_eq!(store.get(&"a"), Some(&7));
    }

    #[test]
    fn test_evict_one_returns_full_entry() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);
        store.get(&"a");
        store.put("b", 2);
        store.get(&"b");
        store.get(&"b");

        let evicted = store.evict_one().unwrap();
        assert_eq!(evicted, Entry::new("a", 1, 0).with_frequency(2));
        assert!(!store.contains(&"a"));
    }

    #[test]
    fn test_clear() {
        let mut store = FrequencyOrderedStore::new();
        store.put("a", 1);
        store.put("b", 2);
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.peek_eviction_candidate(), None);

        store.put("c", 3);
        assert_eq!(store.take(&"c").unwrap().sequence, 2);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let run = || {
            let mut store = FrequencyOrderedStore::new();
            for (i, key) in ["k1", "k2", "k3", "k4", "k5"].into_iter().enumerate() {
                store.put(key, i as u32);
            }
            store.get(&"k3");
            store.get(&"k1");
            let mut evicted = Vec::new();
            while let Some(entry) = store.evict_one() {
                evicted.push(entry.key);
            }
            evicted
        };

        let first = run();
        assert_eq!(first, vec!["k2", "k4", "k5", "k3", "k1"]);
        for _ in 0..10 {
            assert_eq!(run(), first);
        }
    }
}
