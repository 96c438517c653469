//! Query cache keyed by REST request path.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

/// A cached response plus its freshness flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedQuery {
    pub value: Value,
    /// Stale entries are still served but should be refetched.
    pub stale: bool,
}

/// Thread-safe cache of REST responses.
///
/// Keys are request paths exactly as sent (`"/api/testimonials"`). Staleness
/// is advisory: a stale entry keeps its last value so the dashboard can
/// render immediately while the refetch is in flight.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<String, CachedQuery>>,
}

impl QueryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fresh response for `key`.
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.entries
            .write()
            .insert(key.into(), CachedQuery { value, stale: false });
    }

    /// Fetch the cached entry for `key`, stale or not.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<CachedQuery> {
        self.entries.read().get(key).cloned()
    }

    /// Whether `key` needs a refetch (missing entries count as stale).
    #[must_use]
    pub fn is_stale(&self, key: &str) -> bool {
        self.entries.read().get(key).is_none_or(|e| e.stale)
    }

    /// Mark the given keys stale. Keys with no cached entry are skipped;
    /// there is nothing to refetch for them yet.
    pub fn invalidate(&self, keys: &[&str]) {
        let mut entries = self.entries.write();
        for key in keys {
            if let Some(entry) = entries.get_mut(*key) {
                entry.stale = true;
            }
        }
    }

    /// Mark every cached entry stale.
    ///
    /// Used after a reconnect, when invalidation events may have been missed.
    pub fn invalidate_all(&self) {
        for entry in self.entries.write().values_mut() {
            entry.stale = true;
        }
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_get() {
        let cache = QueryCache::new();
        cache.insert("/api/users", json!([{"id": 1}]));

        let entry = cache.get("/api/users").expect("entry present");
        assert_eq!(entry.value, json!([{"id": 1}]));
        assert!(!entry.stale);
    }

    #[test]
    fn test_missing_key_counts_as_stale() {
        let cache = QueryCache::new();
        assert!(cache.is_stale("/api/users"));
    }

    #[test]
    fn test_invalidate_marks_stale_but_keeps_value() {
        let cache = QueryCache::new();
        cache.insert("/api/settings", json!({"theme": {}}));

        cache.invalidate(&["/api/settings"]);

        assert!(cache.is_stale("/api/settings"));
        let entry = cache.get("/api/settings").expect("entry kept");
        assert_eq!(entry.value, json!({"theme": {}}));
    }

    #[test]
    fn test_invalidate_unknown_key_is_noop() {
        let cache = QueryCache::new();
        cache.invalidate(&["/api/nothing"]);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_reinsert_clears_staleness() {
        let cache = QueryCache::new();
        cache.insert("/api/users", json!([]));
        cache.invalidate(&["/api/users"]);
        assert!(cache.is_stale("/api/users"));

        cache.insert("/api/users", json!([{"id": 2}]));
        assert!(!cache.is_stale("/api/users"));
    }

    #[test]
    fn test_invalidate_all() {
        let cache = QueryCache::new();
        cache.insert("/api/users", json!([]));
        cache.insert("/api/settings", json!({}));

        cache.invalidate_all();

        assert!(cache.is_stale("/api/users"));
        assert!(cache.is_stale("/api/settings"));
    }
}
