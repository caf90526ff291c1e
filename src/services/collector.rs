use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use crate::models::CoinRecord;
use crate::sources::{CoinSource, SourceError};
use super::CoinCache;

#[derive(Default)]
pub struct CollectorStats {
    pub total_requests: AtomicU64,
    pub successful: AtomicU64,
    pub failed: AtomicU64,
    pub cache_hits: AtomicU64,
}

/// Fetches the coin list through the cache. Errors pass through untouched.
pub struct CoinCollector {
    source: Arc<dyn CoinSource>,
    cache: Arc<CoinCache>,
    stats: CollectorStats,
}

impl CoinCollector {
    pub fn new(source: Arc<dyn CoinSource>, cache: Arc<CoinCache>) -> Self {
        Self {
            source,
            cache,
            stats: CollectorStats::default(),
        }
    }

    pub async fn collect(&self) -> Result<Arc<Vec<CoinRecord>>, SourceError> {
        if let Some(coins) = self.cache.get() {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(coins);
        }
        self.refresh().await
    }

    /// Bypass the cache. On failure the previous entry stays in place.
    pub async fn refresh(&self) -> Result<Arc<Vec<CoinRecord>>, SourceError> {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        match self.source.fetch_markets().await {
            Ok(coins) => {
                self.stats.successful.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Fetched {} coins from {}", coins.len(), self.source.name());
                Ok(self.cache.insert(coins))
            }
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Source {} error: {}", self.source.name(), e);
                Err(e)
            }
        }
    }

    pub fn get_stats(&self) -> &CollectorStats {
        &self.stats
    }

    pub fn cache(&self) -> &Arc<CoinCache> {
        &self.cache
    }
}
