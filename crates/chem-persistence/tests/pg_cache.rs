
use chem_core::{CacheKey, ResultCache};
use chem_persistence::{PgResultCache, PoolProvider};
use serde_json::json;
use test_support::with_pool;

fn unique_key(tag: &str) -> CacheKey {
    let nonce = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    CacheKey::derive("CCO", "epi", Some(tag), &json!({ "nonce": nonce }))
}

#[test]
fn first_insert_wins_and_find_returns_it() {
    let ran = with_pool(|pool| {
        let cache = PgResultCache::new(PoolProvider { pool: pool.clone() });
        let key = unique_key("melting_point");
        assert!(cache.find(&key).unwrap().is_none());

        cache.insert(&key, json!({"value": 1})).unwrap();
        cache.insert(&key, json!({"value": 2})).unwrap();
        let entry = cache.find(&key).unwrap().expect("entry");
        assert_eq!(entry.payload, json!({"value": 1}));
        assert_eq!(entry.key, key);

        assert!(cache.invalidate(&key).unwrap());
        assert!(!cache.invalidate(&key).unwrap());
        assert!(cache.find(&key).unwrap().is_none());
    });
    if ran.is_none() {
        eprintln!("skip (no DATABASE_URL)");
    }
}

#[test]
fn property_is_part_of_the_row() {
    let ran = with_pool(|pool| {
        let cache = PgResultCache::new(PoolProvider { pool: pool.clone() });
        let key = unique_key("boiling_point");
        cache.insert(&key, json!({"value": 78.3})).unwrap();
        assert!(cache.count().unwrap() >= 1);
        let entry = cache.find(&key).unwrap().expect("entry");
        assert_eq!(entry.key.property.as_deref(), Some("boiling_point"));
        cache.invalidate(&key).unwrap();
    });
    if ran.is_none() {
        eprintln!("skip (no DATABASE_URL)");
    }
}
