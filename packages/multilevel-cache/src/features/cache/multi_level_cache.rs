//! Multi-level cache: L1 → L2 → ... → Ln chain with promotion and cascade
//!
//! Data flow:
//! - **Read**: L1 → L2 → ... → Ln; a hit below L1 is moved to L1 keeping its
//!   frequency and sequence
//! - **Write**: always lands in L1; a copy in a lower level is removed first
//! - **Cascade**: an entry evicted from level `i` is admitted into level
//!   `i + 1`, which may evict in turn. Past the last level the chain grows by
//!   one level until `max_levels`; after that the entry is dropped.
//!
//! Invariants after every public call:
//! - a key lives in at most one level
//! - every level holds at most its capacity

use super::cache_level::CacheLevel;
use super::error::CacheResult;
use super::metrics::MultiLevelCacheMetrics;
use super::policy::EvictionPolicyKind;
use super::types::{level_name, CacheSnapshot, Entry};
use crate::config::{ConfigError, MultiLevelCacheConfig, Validatable};
use prometheus::Registry;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, info, warn};

pub struct MultiLevelCache<K = String, V = String> {
    levels: Vec<CacheLevel<K, V>>,
    config: MultiLevelCacheConfig,
    policy: EvictionPolicyKind,
    metrics: MultiLevelCacheMetrics,
}

impl<K, V> MultiLevelCache<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug + 'static,
    V: Clone + 'static,
{
    /// LFU cache registering its metrics into `registry`
    pub fn new(config: MultiLevelCacheConfig, registry: &Registry) -> CacheResult<Self> {
        Self::with_policy(config, EvictionPolicyKind::Lfu, registry)
    }

    /// Cache whose levels all use `policy`
    pub fn with_policy(
        config: MultiLevelCacheConfig,
        policy: EvictionPolicyKind,
        registry: &Registry,
    ) -> CacheResult<Self> {
        config.validate()?;

        let l1_capacity =
            config
                .capacity_for(0)
                .ok_or_else(|| ConfigError::InsufficientCapacities {
                    configured: config.capacities.len(),
                    required: config.max_levels,
                })?;
        let l1 = CacheLevel::new(0, l1_capacity, policy)?;
        let metrics = MultiLevelCacheMetrics::new(registry)?;
        metrics.levels.set(1);
        metrics.set_level_entries(0, 0);

        info!(
            "Multi-level cache created: policy={}, max_levels={}, capacities={:?}",
            policy,
            config.max_levels,
            &config.capacities[..config.max_levels.min(config.capacities.len())]
        );

        Ok(Self {
            levels: vec![l1],
            config,
            policy,
            metrics,
        })
    }

    /// LFU cache with a private metrics registry
    pub fn with_capacities(max_levels: usize, capacities: Vec<usize>) -> CacheResult<Self> {
        Self::new(
            MultiLevelCacheConfig::new(max_levels, capacities),
            &Registry::new(),
        )
    }

    /// Look up `key` in L1..Ln. A hit below L1 is promoted to L1.
    pub fn read(&mut self, key: &K) -> Option<V> {
        let Some(position) = self.locate(key) else {
            self.metrics.misses.inc();
            return None;
        };

        let value = self.levels[position].read(key).cloned()?;
        self.metrics.record_hit(position);

        if position > 0 {
            self.promote(position, key);
            self.refresh_entry_gauges();
        }
        Some(value)
    }

    /// Insert or update `key` in L1, cascading whatever L1 evicts
    pub fn write(&mut self, key: K, value: V) {
        self.metrics.writes.inc();

        for level in self.levels.iter_mut().skip(1) {
            if level.delete(&key) {
                debug!("Removed stale {:?} from {} before write", key, level.name());
                break;
            }
        }

        if let Some(evicted) = self.levels[0].write(key, value) {
            self.cascade(1, evicted);
        }
        self.refresh_entry_gauges();
    }

    /// Remove `key` from every level. Returns true if any level held it.
    pub fn delete(&mut self, key: &K) -> bool {
        let mut removed = false;
        for level in &mut self.levels {
            if level.delete(key) {
                debug!("Deleted {:?} from {}", key, level.name());
                removed = true;
            }
        }

        if removed {
            self.metrics.deletes.inc();
            self.refresh_entry_gauges();
        }
        removed
    }

    fn promote(&mut self, position: usize, key: &K) {
        let Some(entry) = self.levels[position].take(key) else {
            return;
        };
        debug!(
            "Promoting {:?} from {} to L1 (frequency {})",
            key,
            level_name(position),
            entry.frequency
        );
        self.metrics.promotions.inc();

        if let Some(evicted) = self.levels[0].admit(entry) {
            self.cascade(1, evicted);
        }
    }

    /// Push `entry` into the level at `position`, following evictions down
    /// the chain until one level absorbs it
    fn cascade(&mut self, mut position: usize, mut entry: Entry<K, V>) {
        loop {
            if position == self.levels.len() && !self.grow() {
                warn!(
                    "Dropped {:?} (frequency {}): {} levels full at max_levels",
                    entry.key,
                    entry.frequency,
                    self.levels.len()
                );
                self.metrics.dropped.inc();
                return;
            }

            debug!(
                "Cascading {:?} from {} to {}",
                entry.key,
                level_name(position - 1),
                level_name(position)
            );
            self.metrics.cascades.inc();

            match self.levels[position].admit(entry) {
                Some(evicted) => {
                    entry = evicted;
                    position += 1;
                }
                None => return,
            }
        }
    }

    /// Append the next level if `max_levels` allows it
    fn grow(&mut self) -> bool {
        let position = self.levels.len();
        let Some(capacity) = self.config.capacity_for(position) else {
            return false;
        };

        let level = match CacheLevel::new(position, capacity, self.policy) {
            Ok(level) => level,
            Err(err) => {
                warn!("Cannot create {}: {}", level_name(position), err);
                return false;
            }
        };
        self.levels.push(level);
        self.metrics.levels.set(self.levels.len() as i64);
        info!(
            "Created {} with capacity {} ({}/{} levels)",
            level_name(position),
            capacity,
            self.levels.len(),
            self.config.max_levels
        );
        true
    }

    fn refresh_entry_gauges(&self) {
        for level in &self.levels {
            self.metrics.set_level_entries(level.position(), level.len());
        }
    }

    /// 0-based position of the level holding `key`. Does not count as an access.
    pub fn locate(&self, key: &K) -> Option<usize> {
        self.levels.iter().position(|level| level.contains(key))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    pub fn frequency_of(&self, key: &K) -> Option<u64> {
        self.levels.iter().find_map(|level| level.frequency_of(key))
    }

    /// Entries across all levels
    pub fn len(&self) -> usize {
        self.levels.iter().map(CacheLevel::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(CacheLevel::is_empty)
    }

    /// Summed capacity of the levels created so far
    pub fn capacity(&self) -> usize {
        self.levels.iter().map(CacheLevel::capacity).sum()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn max_levels(&self) -> usize {
        self.config.max_levels
    }

    pub fn level(&self, position: usize) -> Option<&CacheLevel<K, V>> {
        self.levels.get(position)
    }

    pub fn levels(&self) -> &[CacheLevel<K, V>] {
        &self.levels
    }

    pub fn policy(&self) -> EvictionPolicyKind {
        self.policy
    }

    pub fn config(&self) -> &MultiLevelCacheConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MultiLevelCacheMetrics {
        &self.metrics
    }

    pub fn snapshot(&self) -> CacheSnapshot<K, V> {
        CacheSnapshot {
            levels: self.levels.iter().map(CacheLevel::snapshot).collect(),
        }
    }

    /// Empty every level. Grown levels stay in the chain.
    pub fn clear(&mut self) {
        for level in &mut self.levels {
            level.clear();
        }
        self.refresh_entry_gauges();
        debug!("Cleared {} levels", self.levels.len());
    }
}

impl<K, V> fmt::Display for MultiLevelCache<K, V>
where
    K: Hash + Eq + Clone + fmt::Display + 'static,
    V: Clone + fmt::Display + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, level) in self.levels.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", level_name(i), level)?;
        }
        Ok(())
    }
}

impl<K, V> fmt::Debug for MultiLevelCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiLevelCache")
            .field("policy", &self.policy)
            .field("max_levels", &self.config.max_levels)
            .field("levels", &self.levels)
            .finish()
    }
}
