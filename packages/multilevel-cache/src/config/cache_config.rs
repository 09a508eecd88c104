//! Multi-level cache configuration
//!
//! `max_levels` bounds how far the chain may grow; `capacities[i]` is the size
//! of the level created at position `i` (L1 = position 0). Capacities beyond
//! `max_levels` are accepted but never used.

use super::error::{ConfigError, ConfigResult};
use super::validation::{validate_capacity, validate_max_levels, Validatable};
use serde::{Deserialize, Serialize};

/// Configuration for [`MultiLevelCache`](crate::features::cache::MultiLevelCache)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultiLevelCacheConfig {
    /// Maximum number of levels the chain may grow to (1..=10)
    pub max_levels: usize,

    /// Per-position level capacities, each in 1..=1000
    pub capacities: Vec<usize>,
}

impl Default for MultiLevelCacheConfig {
    fn default() -> Self {
        Self {
            max_levels: 3,
            capacities: vec![2, 3, 4],
        }
    }
}

impl MultiLevelCacheConfig {
    pub fn new(max_levels: usize, capacities: Vec<usize>) -> Self {
        Self {
            max_levels,
            capacities,
        }
    }

    pub fn max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }

    pub fn capacities(mut self, capacities: Vec<usize>) -> Self {
        self.capacities = capacities;
        self
    }

    /// Append the capacity for the next level position
    pub fn push_capacity(mut self, capacity: usize) -> Self {
        self.capacities.push(capacity);
        self
    }

    /// Capacity of the level at `position`, if that level may ever exist
    pub fn capacity_for(&self, position: usize) -> Option<usize> {
        if position >= self.max_levels {
            return None;
        }
        self.capacities.get(position).copied()
    }

    /// Total number of entries the fully grown chain can hold
    pub fn total_capacity(&self) -> usize {
        self.capacities.iter().take(self.max_levels).sum()
    }
}

impl Validatable for MultiLevelCacheConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_max_levels(self.max_levels)?;

        if self.capacities.len() < self.max_levels {
            return Err(ConfigError::InsufficientCapacities {
                configured: self.capacities.len(),
                required: self.max_levels,
            });
        }

        for (position, &capacity) in self.capacities.iter().enumerate() {
            validate_capacity(format!("capacities[{}]", position), capacity)?;
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "MultiLevelCacheConfig"
    }
}
