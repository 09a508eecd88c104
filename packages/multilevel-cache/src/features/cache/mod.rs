//! Multi-level key-value cache
//!
//! - **Levels**: an ordered chain L1..Ln, each a bounded store with its own
//!   eviction order (LFU by default, LRU or FIFO on request)
//! - **Read**: first hit wins; hits below L1 are promoted to L1
//! - **Write**: lands in L1; evictions cascade down, growing the chain up to
//!   `max_levels` and dropping past it
//! - **Delete**: clears the key from every level

mod arena;
mod error;
mod frequency_store;
mod list_store;
mod metrics;
mod policy;
mod types;

mod cache_level;
mod multi_level_cache;

pub use error::*;
pub use metrics::*;
pub use policy::{EvictionPolicy, EvictionPolicyKind};
pub use types::*;

pub use cache_level::CacheLevel;
pub use frequency_store::FrequencyOrderedStore;
pub use list_store::{AccessOrder, ListOrderedStore};
pub use multi_level_cache::MultiLevelCache;
