use crate::enrichment::geoip::{CacheStats, GeoCache, GeoInfo};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;

fn geo(country: &str) -> GeoInfo {
    GeoInfo {
        country: country.to_string(),
        ..GeoInfo::default()
    }
}

#[test]
fn hit_and_miss_are_counted() {
    // Arrange
    let cache = GeoCache::new(4);
    cache.insert("1.1.1.1".into(), geo("AU"));

    // Act
    let hit = cache.get("1.1.1.1");
    let miss = cache.get("8.8.8.8");

    // Assert
    assert_eq!(hit, Some(geo("AU")));
    assert_eq!(miss, None);
    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 1,
            misses: 1,
            evictions: 0,
            len: 1,
            capacity: 4,
        }
    );
}

#[test]
fn least_recently_used_entry_is_evicted() {
    // Arrange
    let cache = GeoCache::new(3);
    cache.insert("10.0.0.1".into(), geo("A"));
    cache.insert("10.0.0.2".into(), geo("B"));
    cache.insert("10.0.0.3".into(), geo("C"));

    // Touch the first key so the second becomes the oldest.
    assert!(cache.get("10.0.0.1").is_some());

    // Act
    cache.insert("10.0.0.4".into(), geo("D"));

    // Assert
    assert!(cache.contains("10.0.0.1"));
    assert!(!cache.contains("10.0.0.2"));
    assert!(cache.contains("10.0.0.3"));
    assert!(cache.contains("10.0.0.4"));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn first_key_survives_many_inserts_when_kept_hot() {
    // Arrange
    let cache = GeoCache::new(8);
    cache.insert("key-0".into(), geo("X"));

    // Act
    for i in 1..100 {
        assert!(cache.get("key-0").is_some());
        cache.insert(format!("key-{i}"), geo("Y"));
    }

    // Assert
    assert!(cache.contains("key-0"));
    assert!(!cache.contains("key-1"));
    assert_eq!(cache.stats().len, 8);
    assert_eq!(cache.stats().evictions, 99 - 7);
}

#[test]
fn replacing_a_key_is_not_an_eviction() {
    let cache = GeoCache::new(2);
    cache.insert("1.2.3.4".into(), geo("A"));
    cache.insert("1.2.3.4".into(), geo("B"));

    assert_eq!(cache.get("1.2.3.4"), Some(geo("B")));
    assert_eq!(cache.stats().evictions, 0);
    assert_eq!(cache.stats().len, 1);
}

#[test]
fn zero_capacity_is_raised_to_one() {
    let cache = GeoCache::new(0);
    cache.insert("a".into(), geo("A"));
    cache.insert("b".into(), geo("B"));

    assert_eq!(cache.stats().capacity, 1);
    assert_eq!(cache.stats().len, 1);
    assert!(cache.contains("b"));
}

#[test]
fn concurrent_access_never_exceeds_capacity() {
    // Arrange
    let cache = Arc::new(GeoCache::new(16));

    // Act
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    let key = format!("{t}-{}", i % 40);
                    if cache.get(&key).is_none() {
                        cache.insert(key, GeoInfo::default());
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // Assert
    let stats = cache.stats();
    assert_eq!(stats.len, 16);
    assert_eq!(stats.hits + stats.misses, 8 * 500);
}
