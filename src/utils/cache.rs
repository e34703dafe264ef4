//! Cache em memória das buscas no CMS.
//!
//! Chave `(namespace, texto normalizado)`, capacidade limitada por LRU e expiração
//! por TTL fixo. O lock nunca é mantido através de um `.await`.

use lru::LruCache;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

const DEFAULT_CAPACITY: usize = 1000;

/// Normaliza o texto de busca: sem espaços nas pontas e em minúsculas
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone)]
struct CachedPayload {
    payload: Value,
    inserted_at: Instant,
}

#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

pub struct QueryCache {
    entries: Mutex<LruCache<String, CachedPayload>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl QueryCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or(NonZeroUsize::MIN.saturating_add(DEFAULT_CAPACITY - 1));

        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn key(namespace: &str, query: &str) -> String {
        format!("{}:{}", namespace, normalize_query(query))
    }

    /// Busca um payload ainda válido; entradas expiradas são removidas
    pub fn get(&self, namespace: &str, query: &str) -> Option<Value> {
        let key = Self::key(namespace, query);

        let Ok(mut entries) = self.entries.lock() else {
            log::warn!("⚠️  Lookup cache lock poisoned, bypassing cache");
            return None;
        };

        let lookup = entries
            .get(&key)
            .map(|cached| (cached.inserted_at.elapsed() < self.ttl, cached.payload.clone()));

        match lookup {
            Some((true, payload)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                log::debug!("📦 Cache hit for {}", key);
                return Some(payload);
            }
            Some((false, _)) => {
                entries.pop(&key);
                log::debug!("⌛ Cache entry expired for {}", key);
            }
            None => {}
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        log::debug!("🔎 Cache miss for {}", key);
        None
    }

    pub fn insert(&self, namespace: &str, query: &str, payload: Value) {
        let key = Self::key(namespace, query);

        if let Ok(mut entries) = self.entries.lock() {
            entries.put(
                key.clone(),
                CachedPayload {
                    payload,
                    inserted_at: Instant::now(),
                },
            );
            log::debug!("💾 Cached lookup for {} ({} entries)", key, entries.len());
        }
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().map(|e| e.len()).unwrap_or(0);

        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  LHR "), "lhr");
        assert_eq!(normalize_query(""), "");
    }

    #[test]
    fn test_hit_after_insert_ignores_case() {
        let cache = QueryCache::new(10, Duration::from_secs(60));
        cache.insert("airports", "Lon", json!([{ "iata_code": "LHR" }]));

        assert_eq!(cache.get("airports", "LON"), Some(json!([{ "iata_code": "LHR" }])));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_namespaces_are_separate() {
        let cache = QueryCache::new(10, Duration::from_secs(60));
        cache.insert("airports", "ba", json!(["airport"]));

        assert!(cache.get("airlines", "ba").is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let cache = QueryCache::new(10, Duration::from_millis(10));
        cache.insert("airlines", "klm", json!(["KL"]));

        std::thread::sleep(Duration::from_millis(30));

        assert!(cache.get("airlines", "klm").is_none());
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let cache = QueryCache::new(2, Duration::from_secs(60));
        cache.insert("airports", "a", json!([1]));
        cache.insert("airports", "b", json!([2]));
        assert!(cache.get("airports", "a").is_some());
        cache.insert("airports", "c", json!([3]));

        assert!(cache.get("airports", "b").is_none());
        assert!(cache.get("airports", "a").is_some());
        assert!(cache.get("airports", "c").is_some());
        assert_eq!(cache.stats().entries, 2);
    }

    #[test]
    fn test_zero_capacity_falls_back_to_default() {
        let cache = QueryCache::new(0, Duration::from_secs(60));
        cache.insert("airports", "x", json!([1]));
        assert!(cache.get("airports", "x").is_some());
    }
}
