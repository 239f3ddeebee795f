//! Derivation result cache
//!
//! The same (template, ancestor) pairs recur on every request, and template
//! definitions change rarely, so walk results are memoised for a bounded time.
//! Template edits made at runtime are picked up either when entries expire or
//! when the host calls [`DerivationCache::invalidate`].

use crate::config::CacheConfig;
use crate::model::TemplateId;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

type CacheKey = (TemplateId, TemplateId);

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    derived: bool,
    inserted: Instant,
}

/// Thread-safe, time-bounded cache of derivation results
#[derive(Debug)]
pub struct DerivationCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Point-in-time cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl DerivationCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Build a cache from configuration, or `None` when caching is disabled
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(Duration::from_secs(config.ttl_secs), config.max_entries))
    }

    /// Look up a cached result. Expired entries count as misses.
    pub fn get(&self, template_id: TemplateId, ancestor_id: TemplateId) -> Option<bool> {
        let cached = self
            .entries
            .read()
            .get(&(template_id, ancestor_id))
            .filter(|entry| entry.inserted.elapsed() < self.ttl)
            .map(|entry| entry.derived);

        match cached {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        cached
    }

    pub fn insert(&self, template_id: TemplateId, ancestor_id: TemplateId, derived: bool) {
        let mut entries = self.entries.write();

        if entries.len() >= self.max_entries && !entries.contains_key(&(template_id, ancestor_id)) {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.inserted.elapsed() < ttl);
            if entries.len() >= self.max_entries {
                debug!(
                    max_entries = self.max_entries,
                    "Derivation cache full, clearing"
                );
                entries.clear();
            }
        }

        trace!(template = %template_id, ancestor = %ancestor_id, derived, "Caching derivation result");
        entries.insert(
            (template_id, ancestor_id),
            CacheEntry {
                derived,
                inserted: Instant::now(),
            },
        );
    }

    /// Drop every cached result (call after template definitions change)
    pub fn invalidate(&self) {
        let mut entries = self.entries.write();
        debug!(entries = entries.len(), "Invalidating derivation cache");
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (TemplateId, TemplateId) {
        (TemplateId::new_random(), TemplateId::new_random())
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = DerivationCache::new(Duration::from_secs(60), 16);
        let (a, b) = ids();

        assert_eq!(cache.get(a, b), None);
        cache.insert(a, b, true);
        assert_eq!(cache.get(a, b), Some(true));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_key_is_ordered_pair() {
        let cache = DerivationCache::new(Duration::from_secs(60), 16);
        let (a, b) = ids();

        cache.insert(a, b, true);
        assert_eq!(cache.get(b, a), None);
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let cache = DerivationCache::new(Duration::ZERO, 16);
        let (a, b) = ids();

        cache.insert(a, b, false);
        assert_eq!(cache.get(a, b), None);
    }

    #[test]
    fn test_invalidate_clears() {
        let cache = DerivationCache::new(Duration::from_secs(60), 16);
        let (a, b) = ids();

        cache.insert(a, b, true);
        assert!(!cache.is_empty());
        cache.invalidate();
        assert!(cache.is_empty());
        assert_eq!(cache.get(a, b), None);
    }

    #[test]
    fn test_bounded_size() {
        let cache = DerivationCache::new(Duration::from_secs(60), 4);
        for _ in 0..10 {
            let (a, b) = ids();
            cache.insert(a, b, true);
        }
        assert!(cache.len() <= 4);
    }

    #[test]
    fn test_overwrite_existing_key_when_full() {
        let cache = DerivationCache::new(Duration::from_secs(60), 1);
        let (a, b) = ids();

        cache.insert(a, b, true);
        cache.insert(a, b, false);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(a, b), Some(false));
    }

    #[test]
    fn test_from_config_disabled() {
        let config = CacheConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(DerivationCache::from_config(&config).is_none());
        assert!(DerivationCache::from_config(&CacheConfig::default()).is_some());
    }
}
