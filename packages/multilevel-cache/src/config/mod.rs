//! Cache configuration
//!
//! - Builder API: `MultiLevelCacheConfig::new(3, vec![2, 3, 4])`
//! - Versioned YAML: `MultiLevelCacheConfig::from_yaml("cache.yaml")?`
//!
//! Every value is range-checked before a cache is built; nothing is clamped.

pub mod cache_config;
pub mod error;
pub mod io;
pub mod validation;

pub use cache_config::MultiLevelCacheConfig;
pub use error::{ConfigError, ConfigResult};
pub use io::{CacheConfigFileV1, SUPPORTED_VERSIONS};
pub use validation::{
    validate_capacity, validate_max_levels, Validatable, CAPACITY_LIMIT, MAX_LEVELS_LIMIT,
};
