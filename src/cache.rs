use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-memory map of loaded values keyed by whatever the owning resource
/// depends on (a URL, a script id...). Clones share the same storage.
pub struct ResponseCache<K, V> {
    entries: Arc<Mutex<HashMap<K, V>>>,
}

impl<K, V> Clone for ResponseCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K, V> Default for ResponseCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, V> ResponseCache<K, V> {
    fn entries(&self) -> MutexGuard<'_, HashMap<K, V>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl<K: Eq + Hash, V: Clone> ResponseCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries().get(key).cloned()
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries().insert(key, value);
    }

    pub fn invalidate(&self, key: &K) -> Option<V> {
        self.entries().remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let cache: ResponseCache<String, u32> = ResponseCache::new();
        let other = cache.clone();
        cache.insert("a".into(), 1);
        assert_eq!(other.get(&"a".to_string()), Some(1));

        other.invalidate(&"a".to_string());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = ResponseCache::new();
        cache.insert(1, "one");
        cache.insert(2, "two");
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert_eq!(cache.get(&1), None);
    }
}
