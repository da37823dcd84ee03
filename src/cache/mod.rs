//! Response memoization keyed by canonical call arguments.
//!
//! The cache is an explicit component handed to whoever needs it — there is
//! no process-global instance. Entries live for a fixed retention window;
//! anything that mutates upstream state elsewhere is expected to `flush`
//! (or `flush_prefix`) rather than rely on implicit invalidation.

use std::time::{Duration, Instant};

use dashmap::DashMap;

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

pub struct ResponseCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    enabled: bool,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            enabled: true,
        }
    }

    /// Pure pass-through: reads always miss, writes are dropped.
    pub fn disabled() -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::ZERO,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Fetch a live entry. Entries past the retention window are dropped
    /// lazily on read.
    pub fn get(&self, key: &str) -> Option<V> {
        if !self.enabled {
            return None;
        }

        let expired = match self.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() <= self.ttl => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// Last write wins; concurrent writers need no coordination.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        if !self.enabled {
            return;
        }
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop every entry.
    pub fn flush(&self) {
        self.entries.clear();
    }

    /// Drop entries whose key starts with `prefix`.
    pub fn flush_prefix(&self, prefix: &str) {
        self.entries.retain(|key, _| !key.starts_with(prefix));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build a canonical cache key from an operation name and parameter pairs.
/// Pairs are sorted by name so equivalent argument orders key identically.
pub fn canonical_key(operation: &str, params: &[(&str, String)]) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by_key(|(name, _)| *name);

    let mut key = String::from(operation);
    for (i, (name, value)) in sorted.iter().enumerate() {
        key.push(if i == 0 { '?' } else { '&' });
        key.push_str(name);
        key.push('=');
        key.push_str(value);
    }
    key
}

/// Canonical form of an id list: sorted and comma-joined, so the same set of
/// ids keys identically regardless of input order.
pub fn canonical_id_list<S: AsRef<str>>(ids: &[S]) -> String {
    let mut sorted: Vec<&str> = ids.iter().map(|s| s.as_ref()).collect();
    sorted.sort_unstable();
    sorted.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_what_was_inserted() {
        let cache: ResponseCache<u32> = ResponseCache::new(Duration::from_secs(60));
        cache.insert("orders?a=1", 42);
        assert_eq!(cache.get("orders?a=1"), Some(42));
        assert_eq!(cache.get("orders?a=2"), None);
    }

    #[test]
    fn disabled_cache_is_pass_through() {
        let cache: ResponseCache<u32> = ResponseCache::disabled();
        cache.insert("k", 1);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn entries_expire_after_the_retention_window() {
        let cache: ResponseCache<u32> = ResponseCache::new(Duration::from_millis(10));
        cache.insert("k", 1);
        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty(), "expired entry should be dropped on read");
    }

    #[test]
    fn flush_prefix_only_clears_matching_keys() {
        let cache: ResponseCache<u32> = ResponseCache::new(Duration::from_secs(60));
        cache.insert("orders?loc=1", 1);
        cache.insert("orders?loc=2", 2);
        cache.insert("services?loc=1", 3);

        cache.flush_prefix("orders");
        assert_eq!(cache.get("orders?loc=1"), None);
        assert_eq!(cache.get("services?loc=1"), Some(3));

        cache.flush();
        assert!(cache.is_empty());
    }

    #[test]
    fn canonical_key_is_order_insensitive() {
        let a = canonical_key(
            "orders",
            &[("start", "2024-01-01".into()), ("loc", "7".into())],
        );
        let b = canonical_key(
            "orders",
            &[("loc", "7".into()), ("start", "2024-01-01".into())],
        );
        assert_eq!(a, b);
        assert_eq!(a, "orders?loc=7&start=2024-01-01");
    }

    #[test]
    fn canonical_id_list_sorts_ids() {
        assert_eq!(canonical_id_list(&["b", "a", "c"]), "a,b,c");
        assert_eq!(canonical_id_list(&["a", "c", "b"]), "a,b,c");
    }
}
