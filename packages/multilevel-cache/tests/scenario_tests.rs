//! End-to-end scenarios for the multi-level cache

use multilevel_cache::{
    CacheError, ConfigError, EvictionPolicyKind, MultiLevelCache, MultiLevelCacheConfig,
};
use pretty_assertions::assert_eq;
use prometheus::Registry;
use std::io::Write;
use tempfile::NamedTempFile;

fn s(value: &str) -> String {
    value.to_string()
}

fn level_keys(cache: &MultiLevelCache, position: usize) -> Vec<String> {
    cache
        .snapshot()
        .levels
        .get(position)
        .map(|level| level.keys().cloned().collect())
        .unwrap_or_default()
}

#[test]
fn test_three_level_walkthrough() {
    let mut cache = MultiLevelCache::with_capacities(3, vec![2, 3, 4]).unwrap();

    cache.write(s("a"), s("1"));
    cache.write(s("b"), s("2"));
    cache.write(s("c"), s("3"));
    assert_eq!(cache.to_string(), "L1: {b: 2, c: 3}\nL2: {a: 1}");

    // Hit in L1: no relocation
    assert_eq!(cache.read(&s("b")), Some(s("2")));
    assert_eq!(level_keys(&cache, 0), vec!["c", "b"]);

    // Hit in L2: promoted, L1's LFU victim moves down
    assert_eq!(cache.read(&s("a")), Some(s("1")));
    assert_eq!(level_keys(&cache, 0), vec!["b", "a"]);
    assert_eq!(level_keys(&cache, 1), vec!["c"]);

    assert!(cache.delete(&s("c")));
    assert_eq!(cache.read(&s("c")), None);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_single_level_overflow_is_unrecoverable() {
    let mut cache = MultiLevelCache::with_capacities(1, vec![2]).unwrap();
    cache.write(s("a"), s("1"));
    cache.write(s("b"), s("2"));
    cache.write(s("c"), s("3"));

    assert_eq!(cache.read(&s("a")), None);
    assert_eq!(cache.read(&s("b")), Some(s("2")));
    assert_eq!(cache.read(&s("c")), Some(s("3")));
    assert_eq!(cache.level_count(), 1);
    assert_eq!(cache.metrics().dropped.get(), 1);
}

#[test]
fn test_hot_entry_survives_cascade_with_its_frequency() {
    let mut cache = MultiLevelCache::with_capacities(2, vec![1, 2]).unwrap();
    cache.write(s("hot"), s("h"));
    for _ in 0..5 {
        cache.read(&s("hot"));
    }

    // A fresh write pushes the hot entry into L2 with frequency 6
    cache.write(s("cold"), s("c"));
    assert_eq!(cache.locate(&s("hot")), Some(1));
    assert_eq!(cache.frequency_of(&s("hot")), Some(6));

    // "cold" then "x" are pushed into L2; "cold" is L2's LFU victim
    cache.write(s("x"), s("x"));
    cache.write(s("y"), s("y"));
    assert!(cache.contains(&s("hot")));
    assert_eq!(cache.locate(&s("hot")), Some(1));
    assert_eq!(cache.metrics().dropped.get(), 1);
    assert!(!cache.contains(&s("cold")));
}

#[test]
fn test_max_levels_caps_growth() {
    let mut cache = MultiLevelCache::with_capacities(3, vec![1, 1, 1, 50]).unwrap();
    for i in 0..10 {
        cache.write(format!("k{}", i), i.to_string());
    }

    assert_eq!(cache.level_count(), 3);
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.capacity(), 3);
    assert_eq!(cache.metrics().dropped.get(), 7);
    assert_eq!(cache.metrics().levels.get(), 3);
}

#[test]
fn test_policies_differ_in_what_they_demote() {
    let demoted = |policy: EvictionPolicyKind| {
        let mut cache: MultiLevelCache = MultiLevelCache::with_policy(
            MultiLevelCacheConfig::new(2, vec![3, 3]),
            policy,
            &Registry::new(),
        )
        .unwrap();
        cache.write(s("a"), s("1"));
        cache.write(s("b"), s("2"));
        cache.read(&s("b"));
        cache.write(s("c"), s("3"));
        cache.read(&s("a"));
        cache.write(s("d"), s("4"));
        level_keys(&cache, 1)
    };

    assert_eq!(demoted(EvictionPolicyKind::Lfu), vec!["c"]);
    assert_eq!(demoted(EvictionPolicyKind::Lru), vec!["b"]);
    assert_eq!(demoted(EvictionPolicyKind::Fifo), vec!["a"]);
}

#[test]
fn test_cache_from_yaml_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "version: 1\ncache:\n  max_levels: 2\n  capacities: [1, 5]").unwrap();

    let config = MultiLevelCacheConfig::from_yaml(file.path()).unwrap();
    let registry = Registry::new();
    let mut cache: MultiLevelCache = MultiLevelCache::new(config, &registry).unwrap();

    cache.write(s("a"), s("1"));
    cache.write(s("b"), s("2"));
    assert_eq!(cache.level_count(), 2);
    assert_eq!(cache.level(1).map(|level| level.capacity()), Some(5));

    let families = registry.gather();
    assert!(families
        .iter()
        .any(|family| family.get_name() == "multilevel_cache_cascades_total"));
}

#[test]
fn test_invalid_yaml_never_builds_a_cache() {
    let err = MultiLevelCacheConfig::from_yaml_str("version: 1\ncache:\n  max_levels: 11\n")
        .unwrap_err();
    assert!(matches!(err, ConfigError::Range { .. }));

    let err = MultiLevelCache::<String, String>::with_capacities(2, vec![3]).unwrap_err();
    assert!(matches!(
        err,
        CacheError::Config(ConfigError::InsufficientCapacities { .. })
    ));
}

#[test]
fn test_snapshot_json_lists_levels_in_order() {
    let mut cache = MultiLevelCache::with_capacities(2, vec![1, 1]).unwrap();
    cache.write(s("a"), s("1"));
    cache.write(s("b"), s("2"));

    let json = cache.snapshot().to_json().unwrap();
    let l1 = json.find("\"L1\"").unwrap();
    let l2 = json.find("\"L2\"").unwrap();
    assert!(l1 < l2);
    assert!(json.contains("\"sequence\": 0"));
}

#[test]
fn test_hit_rate_tracks_reads() {
    let mut cache = MultiLevelCache::with_capacities(2, vec![1, 1]).unwrap();
    cache.write(s("a"), s("1"));
    cache.write(s("b"), s("2"));

    cache.read(&s("a"));
    cache.read(&s("a"));
    cache.read(&s("zzz"));

    let metrics = cache.metrics();
    assert_eq!(metrics.level_hits(0), 1);
    assert_eq!(metrics.level_hits(1), 1);
    assert_eq!(metrics.misses.get(), 1);
    assert!((metrics.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
}
