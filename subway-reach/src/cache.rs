//! Caching layer for hover previews.
//!
//! The graph never changes after startup, so a reachable set depends only on
//! the origin platform and the budget. Hovering back and forth over the map
//! hits the same few platforms over and over; caching spares a traversal per
//! pointer move.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::Platform;
use crate::graph::{Cost, Graph};
use crate::reach::{ReachEngine, ReachError, Reachable};

/// Cache key: (origin platform, budget as raw `f64` bits).
type HoverKey = (Platform, u64);

/// Configuration for the hover cache.
#[derive(Debug, Clone)]
pub struct HoverCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for HoverCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 2000,
        }
    }
}

/// Memoised instant-mode reachability.
#[derive(Clone)]
pub struct HoverCache {
    entries: MokaCache<HoverKey, Arc<Reachable>>,
}

impl HoverCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &HoverCacheConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { entries }
    }

    /// Reachable set from `origin` within `budget`, from cache if present.
    ///
    /// Errors are not cached.
    pub async fn reachable(
        &self,
        graph: &Graph,
        origin: &Platform,
        budget: Cost,
    ) -> Result<Arc<Reachable>, ReachError> {
        let key = (origin.clone(), budget.to_bits());

        if let Some(cached) = self.entries.get(&key).await {
            trace!(origin = %origin, budget, "Hover cache hit");
            return Ok(cached);
        }

        let reachable = Arc::new(ReachEngine::new(graph).reachable(origin, budget)?);
        self.entries.insert(key, reachable.clone()).await;

        Ok(reachable)
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures::{platform, simple_graph};

    fn graph() -> Graph {
        simple_graph(
            &[(1, false, &["X", "Y"]), (2, false, &["Z"])],
            &[("X", 1, "Y", 1, 300.0), ("X", 1, "Z", 2, 400.0)],
        )
    }

    #[test]
    fn default_config() {
        let config = HoverCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 2000);
    }

    #[tokio::test]
    async fn cached_result_matches_engine() {
        let graph = graph();
        let cache = HoverCache::new(&HoverCacheConfig::default());
        let origin = platform("X", 1);

        let first = cache.reachable(&graph, &origin, 1800.0).await.unwrap();
        let second = cache.reachable(&graph, &origin, 1800.0).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            *first,
            ReachEngine::new(&graph).reachable(&origin, 1800.0).unwrap()
        );
    }

    #[tokio::test]
    async fn budget_is_part_of_the_key() {
        let graph = graph();
        let cache = HoverCache::new(&HoverCacheConfig::default());
        let origin = platform("X", 1);

        let wide = cache.reachable(&graph, &origin, 1800.0).await.unwrap();
        let narrow = cache.reachable(&graph, &origin, 350.0).await.unwrap();

        assert_eq!(wide.stations.len(), 3);
        assert_eq!(narrow.stations.len(), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let graph = graph();
        let cache = HoverCache::new(&HoverCacheConfig::default());

        let err = cache
            .reachable(&graph, &platform("Q", 1), 1800.0)
            .await
            .unwrap_err();
        assert_eq!(err, ReachError::UnknownPlatform(platform("Q", 1)));

        cache.entries.run_pending_tasks().await;
        assert_eq!(cache.entry_count(), 0);
    }
}
