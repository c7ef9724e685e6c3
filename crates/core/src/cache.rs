//! Injectable holder for the most recent scan result.
//!
//! Every scan is a stateless recomputation; the cache only exists so a
//! presentation layer can re-read the latest report without re-scanning.
//! It is replaced wholesale on each store and is never persisted.

use std::sync::Arc;

use parking_lot::RwLock;

/// Thread-safe holder of the latest value of type `T`.
///
/// Concurrent scans may race on `store`; the loser's result is simply
/// replaced. Staleness, not correctness, is the only consequence.
#[derive(Debug)]
pub struct ResultCache<T> {
    latest: Arc<RwLock<Option<T>>>,
}

impl<T: Clone> ResultCache<T> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// Replaces the cached value.
    pub fn store(&self, value: T) {
        *self.latest.write() = Some(value);
    }

    /// Returns a clone of the latest value, if any.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.latest.read().clone()
    }

    /// Clears the cache.
    pub fn clear(&self) {
        *self.latest.write() = None;
    }

    /// Returns true if nothing has been stored since creation or the last
    /// clear.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.latest.read().is_none()
    }
}

impl<T: Clone> Default for ResultCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ResultCache<T> {
    fn clone(&self) -> Self {
        Self {
            latest: Arc::clone(&self.latest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_on_creation() {
        let cache: ResultCache<Vec<u32>> = ResultCache::new();
        assert!(cache.is_empty());
        assert!(cache.latest().is_none());
    }

    #[test]
    fn test_store_replaces_wholesale() {
        let cache = ResultCache::new();
        cache.store(vec![1, 2, 3]);
        cache.store(vec![4]);
        assert_eq!(cache.latest(), Some(vec![4]));
    }

    #[test]
    fn test_clear() {
        let cache = ResultCache::new();
        cache.store("report".to_string());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = ResultCache::new();
        let handle = cache.clone();
        cache.store(7u8);
        assert_eq!(handle.latest(), Some(7));
    }
}
