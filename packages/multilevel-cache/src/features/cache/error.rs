//! Error types for cache system

use crate::config::ConfigError;
use thiserror::Error;

/// Construction-time failures. Reads, writes and deletes never fail; a miss is
/// `None`, not an error.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Invalid cache configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Metrics registration failed: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;
