//! Prometheus metrics for the multi-level cache

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_vec_with_registry, register_int_gauge_with_registry, IntCounter,
    IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
};

use super::types::level_name;

#[derive(Clone)]
pub struct MultiLevelCacheMetrics {
    /// Read hits, labelled by the level that held the key
    pub hits: IntCounterVec,
    pub misses: IntCounter,
    pub writes: IntCounter,
    pub deletes: IntCounter,
    /// Hits below L1 relocated to L1
    pub promotions: IntCounter,
    /// Evicted entries moved one level down
    pub cascades: IntCounter,
    /// Entries lost because the last level was full at max_levels
    pub dropped: IntCounter,
    pub levels: IntGauge,
    pub entries: IntGaugeVec,
}

impl MultiLevelCacheMetrics {
    pub fn new(registry: &Registry) -> prometheus::Result<Self> {
        Ok(Self {
            hits: register_int_counter_vec_with_registry!(
                Opts::new("multilevel_cache_hits_total", "Read hits per level"),
                &["level"],
                registry
            )?,
            misses: register_int_counter_with_registry!(
                Opts::new("multilevel_cache_misses_total", "Reads absent from every level"),
                registry
            )?,
            writes: register_int_counter_with_registry!(
                Opts::new("multilevel_cache_writes_total", "Writes into L1"),
                registry
            )?,
            deletes: register_int_counter_with_registry!(
                Opts::new("multilevel_cache_deletes_total", "Deletes that removed a key"),
                registry
            )?,
            promotions: register_int_counter_with_registry!(
                Opts::new("multilevel_cache_promotions_total", "Entries promoted to L1"),
                registry
            )?,
            cascades: register_int_counter_with_registry!(
                Opts::new(
                    "multilevel_cache_cascades_total",
                    "Evicted entries moved to a lower level"
                ),
                registry
            )?,
            dropped: register_int_counter_with_registry!(
                Opts::new(
                    "multilevel_cache_dropped_total",
                    "Entries dropped from the last level at max_levels"
                ),
                registry
            )?,
            levels: register_int_gauge_with_registry!(
                Opts::new("multilevel_cache_levels", "Number of levels in the chain"),
                registry
            )?,
            entries: register_int_gauge_vec_with_registry!(
                Opts::new("multilevel_cache_entries", "Entry count per level"),
                &["level"],
                registry
            )?,
        })
    }

    pub fn record_hit(&self, position: usize) {
        self.hits.with_label_values(&[level_name(position).as_str()]).inc();
    }

    pub fn level_hits(&self, position: usize) -> u64 {
        self.hits.with_label_values(&[level_name(position).as_str()]).get()
    }

    pub fn set_level_entries(&self, position: usize, len: usize) {
        self.entries
            .with_label_values(&[level_name(position).as_str()])
            .set(len as i64);
    }

    pub fn level_entries(&self, position: usize) -> i64 {
        self.entries.with_label_values(&[level_name(position).as_str()]).get()
    }

    /// Hits across all levels
    pub fn total_hits(&self) -> u64 {
        (0..self.levels.get().max(0) as usize)
            .map(|position| self.level_hits(position))
            .sum()
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.total_hits() as f64;
        let total = hits + self.misses.get() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}
