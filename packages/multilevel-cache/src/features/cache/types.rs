//! Core types for the multi-level cache

use serde::{Deserialize, Serialize};

/// A cached key-value pair with its access bookkeeping
///
/// `frequency` counts reads and updates since the key's last fresh write.
/// `sequence` is stamped once, on that fresh write, and travels with the entry
/// when it is promoted or cascaded to another level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<K = String, V = String> {
    pub key: K,
    pub value: V,
    pub frequency: u64,
    pub sequence: u64,
}

impl<K, V> Entry<K, V> {
    /// Fresh entry at frequency 1
    pub fn new(key: K, value: V, sequence: u64) -> Self {
        Self {
            key,
            value,
            frequency: 1,
            sequence,
        }
    }

    pub fn with_frequency(mut self, frequency: u64) -> Self {
        self.frequency = frequency.max(1);
        self
    }

    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Display name of the level at a 0-based position (`L1`, `L2`, ...)
pub fn level_name(position: usize) -> String {
    format!("L{}", position + 1)
}

/// Point-in-time copy of one level's contents, in eviction order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot<K = String, V = String> {
    pub name: String,
    pub capacity: usize,
    pub entries: Vec<Entry<K, V>>,
}

impl<K, V> LevelSnapshot<K, V> {
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|entry| &entry.key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Point-in-time copy of the whole chain, L1 first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSnapshot<K = String, V = String> {
    pub levels: Vec<LevelSnapshot<K, V>>,
}

impl<K, V> CacheSnapshot<K, V> {
    /// Total number of entries across all levels
    pub fn len(&self) -> usize {
        self.levels.iter().map(LevelSnapshot::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(LevelSnapshot::is_empty)
    }
}

impl<K: Serialize, V: Serialize> CacheSnapshot<K, V> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
