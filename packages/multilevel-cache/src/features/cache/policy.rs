//! Eviction policy abstraction
//!
//! A cache level only needs {get, put, remove, peek_eviction_candidate,
//! evict_one} from its store. Each policy is a store implementing that
//! capability set, picked once when the level is built:
//!
//! - **LFU** ([`FrequencyOrderedStore`]): lowest frequency first, earliest
//!   arrival in the frequency tier breaks ties
//! - **LRU** ([`ListOrderedStore::recency`]): least recently accessed first
//! - **FIFO** ([`ListOrderedStore::insertion`]): earliest arrival first

use super::frequency_store::FrequencyOrderedStore;
use super::list_store::ListOrderedStore;
use super::types::Entry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Storage and eviction ordering for a single cache level
///
/// Stores never enforce capacity; the owning level decides when to evict.
pub trait EvictionPolicy<K, V> {
    /// Look up a value, counting the access
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Insert a fresh entry or update an existing one (counts as an access)
    fn put(&mut self, key: K, value: V);

    /// Insert an entry relocated from another level, keeping its frequency
    /// and sequence
    fn admit(&mut self, entry: Entry<K, V>);

    /// Remove a key and hand back its entry
    fn take(&mut self, key: &K) -> Option<Entry<K, V>>;

    fn remove(&mut self, key: &K) -> bool {
        self.take(key).is_some()
    }

    /// Key that `evict_one` would remove next
    fn peek_eviction_candidate(&self) -> Option<&K>;

    fn evict_one(&mut self) -> Option<Entry<K, V>>;

    fn contains(&self, key: &K) -> bool;

    fn frequency_of(&self, key: &K) -> Option<u64>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in eviction order (next victim first)
    fn entries(&self) -> Box<dyn Iterator<Item = &Entry<K, V>> + '_>;

    fn clear(&mut self);

    fn kind(&self) -> EvictionPolicyKind;
}

/// Which eviction policy a level's store uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicyKind {
    /// Least frequently used, insertion order among equal frequencies
    #[default]
    Lfu,
    /// Least recently used
    Lru,
    /// First in, first out
    Fifo,
}

impl EvictionPolicyKind {
    /// Build an empty store for this policy
    pub fn build<K, V>(self, capacity: usize) -> Box<dyn EvictionPolicy<K, V>>
    where
        K: Hash + Eq + Clone + 'static,
        V: 'static,
    {
        match self {
            Self::Lfu => Box::new(FrequencyOrderedStore::with_capacity(capacity)),
            Self::Lru => Box::new(ListOrderedStore::recency(capacity)),
            Self::Fifo => Box::new(ListOrderedStore::insertion(capacity)),
        }
    }

    /// Parse policy from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "lfu" => Ok(Self::Lfu),
            "lru" => Ok(Self::Lru),
            "fifo" => Ok(Self::Fifo),
            _ => Err(format!(
                "Unknown eviction policy '{}'. Valid policies: lfu, lru, fifo",
                s
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lfu => "lfu",
            Self::Lru => "lru",
            Self::Fifo => "fifo",
        }
    }
}

impl fmt::Display for EvictionPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
