use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use crate::models::CoinRecord;

struct Entry {
    coins: Arc<Vec<CoinRecord>>,
    fetched_at: Instant,
}

/// Holds the most recent coin list for a short TTL.
pub struct CoinCache {
    entry: RwLock<Option<Entry>>,
    ttl: Duration,
}

impl CoinCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self::with_ttl(Duration::from_secs(ttl_seconds))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    /// Cached list if it is still fresh. Cloning only bumps the Arc.
    pub fn get(&self) -> Option<Arc<Vec<CoinRecord>>> {
        self.get_at(Instant::now())
    }

    fn get_at(&self, now: Instant) -> Option<Arc<Vec<CoinRecord>>> {
        let entry = self.entry.read();
        entry.as_ref()
            .filter(|e| now.saturating_duration_since(e.fetched_at) < self.ttl)
            .map(|e| e.coins.clone())
    }

    /// Last list regardless of age, for display while a refresh is failing.
    pub fn last(&self) -> Option<Arc<Vec<CoinRecord>>> {
        self.entry.read().as_ref().map(|e| e.coins.clone())
    }

    pub fn insert(&self, coins: Vec<CoinRecord>) -> Arc<Vec<CoinRecord>> {
        let coins = Arc::new(coins);
        *self.entry.write() = Some(Entry {
            coins: coins.clone(),
            fetched_at: Instant::now(),
        });
        coins
    }

    pub fn clear(&self) {
        *self.entry.write() = None;
    }

    pub fn len(&self) -> usize {
        self.entry.read().as_ref().map(|e| e.coins.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
