//! In-memory search result cache.
//!
//! Repeated queries within a session are common (practitioners flip between
//! the same handful of organs), so successful results are kept in a bounded
//! map keyed by the exact trimmed query string. Eviction is deliberately
//! blunt: when an insertion would exceed the capacity, the whole cache is
//! cleared first. The per-session working set is small enough that LRU
//! bookkeeping buys nothing here; the full-clear threshold is part of the
//! component's contract and must not be quietly upgraded.

use crate::domain::SearchResult;
use std::collections::HashMap;

/// Default number of cached queries before a full clear.
pub const DEFAULT_CAPACITY: usize = 50;

/// Bounded query-to-result map with full-clear overflow behavior.
///
/// Lookups are exact string matches; no normalization happens internally, so
/// callers must pass the same trimmed string they stored under. Entries live
/// as long as the owning coordinator; there is no time-based expiry.
#[derive(Debug)]
pub struct ResultsCache {
    /// Cached results keyed by the exact query string.
    entries: HashMap<String, SearchResult>,

    /// Entry count at which the next insertion clears everything first.
    capacity: usize,
}

impl ResultsCache {
    /// Creates an empty cache with the given capacity.
    ///
    /// A capacity of zero is treated as one so `put` always retains the
    /// entry it just inserted.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Looks up the result stored for an exact query string.
    #[must_use]
    pub fn get(&self, query: &str) -> Option<SearchResult> {
        self.entries.get(query).cloned()
    }

    /// Stores a result, clearing the whole cache first when full.
    ///
    /// The clear-then-insert rule applies whenever the entry count has
    /// reached capacity, even if the key is already present.
    pub fn put(&mut self, query: &str, result: SearchResult) {
        if self.entries.len() >= self.capacity {
            tracing::debug!(
                discarded = self.entries.len(),
                capacity = self.capacity,
                "cache full, clearing all entries"
            );
            self.entries.clear();
        }
        self.entries.insert(query.to_string(), result);
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        tracing::debug!(discarded = self.entries.len(), "cache cleared");
        self.entries.clear();
    }

    /// Returns the number of cached queries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResultsCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{empty_result, OrganRecord};
    use std::sync::Arc;

    fn result_for(organ: &str) -> SearchResult {
        Arc::new(vec![OrganRecord {
            organ: organ.to_string(),
            patterns: vec![],
        }])
    }

    #[test]
    fn lookup_is_exact_string_match() {
        let mut cache = ResultsCache::default();
        cache.put("Liver", result_for("Liver"));

        assert!(cache.get("Liver").is_some());
        assert!(cache.get("liver").is_none());
        assert!(cache.get("Liver ").is_none());
    }

    #[test]
    fn stored_result_is_shared_not_copied() {
        let mut cache = ResultsCache::default();
        let stored = result_for("Liver");
        cache.put("Liver", stored.clone());

        let fetched = cache.get("Liver").unwrap();
        assert!(Arc::ptr_eq(&stored, &fetched));
    }

    #[test]
    fn overflow_clears_all_prior_entries() {
        let mut cache = ResultsCache::new(50);
        for i in 0..50 {
            cache.put(&format!("query-{i}"), empty_result());
        }
        assert_eq!(cache.len(), 50);

        cache.put("query-50", empty_result());

        assert_eq!(cache.len(), 1);
        assert!(cache.get("query-50").is_some());
        for i in 0..50 {
            assert!(cache.get(&format!("query-{i}")).is_none(), "query-{i} survived the clear");
        }
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache = ResultsCache::default();
        cache.put("Liver", empty_result());
        cache.put("Spleen", empty_result());

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get("Liver").is_none());
    }

    #[test]
    fn zero_capacity_still_retains_latest_entry() {
        let mut cache = ResultsCache::new(0);
        cache.put("Liver", empty_result());
        assert!(cache.get("Liver").is_some());
    }
}
