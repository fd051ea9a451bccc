use chrono::Utc;
use dashmap::DashMap;
use log::debug;
use serde_json::Value;

use super::{CacheEntry, CacheKey, ResultCache};
use crate::errors::CacheError;

/// Caché en memoria (tests, desarrollo y despliegues sin `DATABASE_URL`).
#[derive(Default)]
pub struct InMemoryResultCache {
    inner: DashMap<String, CacheEntry>,
}

impl InMemoryResultCache {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.inner.len()
    }
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl ResultCache for InMemoryResultCache {
    fn find(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.inner.get(&key.digest).map(|e| e.value().clone()))
    }

    fn insert(&self, key: &CacheKey, payload: Value) -> Result<(), CacheError> {
        self.inner.entry(key.digest.clone()).or_insert_with(|| {
            debug!("cache insert digest={} calculator={}", key.digest, key.calculator);
            CacheEntry { key: key.clone(),
                         payload,
                         created_at: Utc::now() }
        });
        Ok(())
    }

    fn invalidate(&self, key: &CacheKey) -> Result<bool, CacheError> {
        Ok(self.inner.remove(&key.digest).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_insert_wins() {
        let cache = InMemoryResultCache::new();
        let key = CacheKey::derive("CCO", "epi", Some("koc"), &json!({}));
        cache.insert(&key, json!({"value": 1})).unwrap();
        cache.insert(&key, json!({"value": 2})).unwrap();
        let entry = cache.find(&key).unwrap().expect("entry present");
        assert_eq!(entry.payload, json!({"value": 1}));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_removes_entry() {
        let cache = InMemoryResultCache::new();
        let key = CacheKey::derive("CCO", "epi", Some("koc"), &json!({}));
        assert!(!cache.invalidate(&key).unwrap());
        cache.insert(&key, json!(1)).unwrap();
        assert!(cache.invalidate(&key).unwrap());
        assert!(cache.find(&key).unwrap().is_none());
    }
}
