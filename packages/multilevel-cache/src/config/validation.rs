//! Configuration validation
//!
//! Code that builds cache structures depends on the `Validatable` trait rather
//! than on concrete config types, so levels and whole chains are checked the
//! same way before anything is allocated.

use super::error::{ConfigError, ConfigResult};

/// Upper bound on the number of levels in one cache chain
pub const MAX_LEVELS_LIMIT: usize = 10;

/// Upper bound on the number of entries a single level may hold
pub const CAPACITY_LIMIT: usize = 1000;

/// Trait for validatable configuration objects
///
/// # Example
/// ```rust,ignore
/// use multilevel_cache::config::Validatable;
///
/// fn build<C: Validatable>(config: C) -> ConfigResult<()> {
///     config.validate()?;
///     // ... allocate levels
/// }
/// ```
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Get the configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

/// Check a level count against `1..=MAX_LEVELS_LIMIT`
pub fn validate_max_levels(max_levels: usize) -> ConfigResult<()> {
    if max_levels == 0 || max_levels > MAX_LEVELS_LIMIT {
        return Err(ConfigError::range_with_hint(
            "max_levels",
            max_levels,
            1,
            MAX_LEVELS_LIMIT,
            "A cache chain needs at least L1 and holds at most 10 levels",
        ));
    }
    Ok(())
}

/// Check a single level capacity against `1..=CAPACITY_LIMIT`
pub fn validate_capacity(field: impl Into<String>, capacity: usize) -> ConfigResult<()> {
    if capacity == 0 || capacity > CAPACITY_LIMIT {
        return Err(ConfigError::range_with_hint(
            field,
            capacity,
            1,
            CAPACITY_LIMIT,
            "Every level must hold at least one entry",
        ));
    }
    Ok(())
}
