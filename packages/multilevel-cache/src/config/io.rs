//! Configuration I/O (YAML loading)
//!
//! Schema v1:
//!
//! ```yaml
//! version: 1
//! cache:
//!   max_levels: 3
//!   capacities: [2, 3, 4]
//! ```

use super::cache_config::MultiLevelCacheConfig;
use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Schema versions this crate can read
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

const ROOT_FIELDS: &[&str] = &["version", "cache"];
const CACHE_FIELDS: &[&str] = &["max_levels", "capacities"];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: u32,

    #[serde(default)]
    pub cache: MultiLevelCacheConfig,
}

impl MultiLevelCacheConfig {
    /// Load and validate a configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let document: Value = serde_yaml::from_str(yaml)?;
        let root = document.as_mapping().ok_or_else(|| {
            ConfigError::Validation("configuration root must be a mapping".to_string())
        })?;

        let version = root.get("version").ok_or(ConfigError::MissingVersion)?;
        let version = version
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| {
                ConfigError::Validation(format!("'version' must be an integer, got {:?}", version))
            })?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        check_known_fields(root, ROOT_FIELDS, "root")?;
        if let Some(cache) = root.get("cache").and_then(Value::as_mapping) {
            check_known_fields(cache, CACHE_FIELDS, "cache")?;
        }

        let file: CacheConfigFileV1 = serde_yaml::from_value(document)?;
        file.cache.validate()?;
        Ok(file.cache)
    }

    /// Serialize as a v1 YAML document
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = CacheConfigFileV1 {
            version: 1,
            cache: self.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

/// Reject unknown keys with a closest-match suggestion
fn check_known_fields(mapping: &Mapping, valid: &[&str], section: &str) -> ConfigResult<()> {
    for key in mapping.keys() {
        // Non-string keys are left for serde to reject
        let Some(name) = key.as_str() else {
            continue;
        };
        if !valid.contains(&name) {
            return Err(ConfigError::unknown_field_with_suggestion(
                name,
                section,
                valid.iter().map(|field| field.to_string()).collect(),
            ));
        }
    }
    Ok(())
}
