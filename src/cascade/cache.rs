//! Memoizing cascade wrapper.
//!
//! Documents repeat the same tag paths constantly (every cell of a table,
//! every run of a paragraph), so lookups are cached per path.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::{CascadeRuleSet, TagPath};
use crate::attr::Bag;

// =============================================================================
// CachedCascade
// =============================================================================

/// Thread-safe memo over any `CascadeRuleSet`.
///
/// Uses `parking_lot::RwLock` so parallel parses can share one instance.
#[derive(Debug)]
pub struct CachedCascade<C> {
    inner: C,
    memo: RwLock<FxHashMap<TagPath, Bag>>,
}

impl<C: CascadeRuleSet> CachedCascade<C> {
    /// Wrap a rule set with an empty cache.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            memo: RwLock::new(FxHashMap::default()),
        }
    }

    /// Execute a closure with read access to the cache.
    pub fn with_read<R>(&self, f: impl FnOnce(&FxHashMap<TagPath, Bag>) -> R) -> R {
        let guard = self.memo.read();
        f(&guard)
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.with_read(|m| m.len())
    }

    /// Check if nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.with_read(|m| m.is_empty())
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.memo.write().clear();
    }

    /// The wrapped rule set.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Unwrap, discarding the cache.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: CascadeRuleSet> CascadeRuleSet for CachedCascade<C> {
    fn find(&self, path: &TagPath) -> Bag {
        if let Some(bag) = self.with_read(|m| m.get(path).cloned()) {
            return bag;
        }
        let bag = self.inner.find(path);
        self.memo.write().insert(path.clone(), bag.clone());
        bag
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::attr::AttrsExt;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl CascadeRuleSet for Counting {
        fn find(&self, path: &TagPath) -> Bag {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut bag = Bag::new();
            bag.attrs.set_attr("depth", path.len().to_string());
            bag
        }
    }

    #[test]
    fn test_lookups_are_memoized() {
        let cache = CachedCascade::new(Counting::default());
        let path: TagPath = ["pdf", "div"].into_iter().collect();

        assert_eq!(cache.find(&path).attrs.get_attr("depth"), Some("2"));
        assert_eq!(cache.find(&path).attrs.get_attr("depth"), Some("2"));
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);

        let other: TagPath = ["pdf", "div.note"].into_iter().collect();
        cache.find(&other);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        cache.find(&path);
        assert_eq!(cache.into_inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_cache_is_send_sync() {
        static_assertions::assert_impl_all!(CachedCascade<crate::cascade::StyleSheet>: Send, Sync);
    }
}
