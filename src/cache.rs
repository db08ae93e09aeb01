//! Memoized stats tables
//!
//! Keyed by `(snapshot version, filter fingerprint)`. A cache serves one
//! partition of one snapshot; call `invalidate` when the partition changes.

use crate::analysis::{analyze, StatsFilter, StatsRow};
use crate::config::CacheConfig;
use crate::graph::{GraphSnapshot, Subgraph};
use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::debug;

type CacheKey = (u64, Option<u64>);

/// LRU cache of `analyze` results
pub struct StatsCache {
    entries: LruCache<CacheKey, Vec<StatsRow>>,
    hits: u64,
    misses: u64,
}

impl StatsCache {
    /// A capacity of 0 is treated as 1
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        StatsCache {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.stats_capacity)
    }

    /// Cached table for this snapshot and filter, computing it on a miss
    pub fn get_or_compute(
        &mut self,
        snapshot: &GraphSnapshot,
        subgraphs: &[Subgraph<'_>],
        filter: Option<&StatsFilter>,
    ) -> Vec<StatsRow> {
        let key = (snapshot.version(), filter.map(StatsFilter::fingerprint));

        if let Some(rows) = self.entries.get(&key) {
            self.hits += 1;
            debug!(version = key.0, "stats cache hit");
            return rows.clone();
        }

        self.misses += 1;
        let rows = analyze(subgraphs, filter);
        self.entries.put(key, rows.clone());
        rows
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::partition_all;
    use crate::graph::{Link, Node};

    fn snapshot() -> GraphSnapshot {
        GraphSnapshot::new(
            vec![
                Node::new("A", "Entity.Organization.Company").with_revenue(10.0),
                Node::new("B", "Entity.Person"),
                Node::new("C", "Entity.Person"),
            ],
            vec![Link::new("A", "B", "Event.WorksFor", "2020-01-01")],
        )
    }

    #[test]
    fn test_hit_after_miss() {
        let snapshot = snapshot();
        let parts = partition_all(&snapshot);
        let mut cache = StatsCache::new(4);

        let first = cache.get_or_compute(&snapshot, &parts, None);
        let second = cache.get_or_compute(&snapshot, &parts, None);
        assert_eq!(first, second);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));

        // equivalent filters share an entry
        let one = StatsFilter::new().with_revenue_range(1.0, 100.0);
        let zero = StatsFilter::new().with_revenue_range(0.0, 100.0);
        cache.get_or_compute(&snapshot, &parts, Some(&one));
        cache.get_or_compute(&snapshot, &parts, Some(&zero));
        assert_eq!((cache.hits(), cache.misses()), (2, 2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_unfiltered_and_default_filter_are_distinct() {
        let snapshot = snapshot();
        let parts = partition_all(&snapshot);
        let mut cache = StatsCache::new(4);

        cache.get_or_compute(&snapshot, &parts, None);
        cache.get_or_compute(&snapshot, &parts, Some(&StatsFilter::new()));
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_capacity_and_invalidate() {
        let snapshot = snapshot();
        let parts = partition_all(&snapshot);
        let mut cache = StatsCache::new(1);

        cache.get_or_compute(&snapshot, &parts, None);
        cache.get_or_compute(&snapshot, &parts, Some(&StatsFilter::new().with_search_term("a")));
        assert_eq!(cache.len(), 1);

        cache.invalidate();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_from_config() {
        let snapshot = snapshot();
        let parts = partition_all(&snapshot);
        let mut cache = StatsCache::from_config(&CacheConfig { stats_capacity: 2 });

        for term in ["a", "b", "c"] {
            cache.get_or_compute(&snapshot, &parts, Some(&StatsFilter::new().with_search_term(term)));
        }
        assert_eq!(cache.len(), 2);

        // the oldest entry was evicted
        cache.get_or_compute(&snapshot, &parts, Some(&StatsFilter::new().with_search_term("a")));
        assert_eq!((cache.hits(), cache.misses()), (0, 4));
    }
}
