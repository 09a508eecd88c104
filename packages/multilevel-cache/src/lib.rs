/*
 * Multilevel Cache - tiered in-memory key-value cache
 *
 * Layout:
 * - config/    : Validated configuration + versioned YAML loading
 * - features/  : Cache levels, eviction stores, multi-level orchestration
 *
 * Behaviour:
 * - Reads promote lower-level hits to L1
 * - L1 evictions cascade down the chain, growing it up to max_levels
 * - Deterministic eviction order for every policy
 */

#![allow(clippy::should_implement_trait)] // from_str naming intentional

/// Configuration system
pub mod config;

/// Feature modules
pub mod features;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, ConfigResult, MultiLevelCacheConfig, Validatable};
pub use features::cache::{
    CacheError, CacheLevel, CacheResult, CacheSnapshot, Entry, EvictionPolicy,
    EvictionPolicyKind, LevelSnapshot, MultiLevelCache, MultiLevelCacheMetrics,
};
