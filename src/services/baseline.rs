use parking_lot::Mutex;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use crate::models::{IndexBaseline, IndexConstituent};
use super::index::total_market_cap;
use super::storage::{save, KeyValueStore, StorageError, Stored};

pub const BASELINE_KEY: &str = "anon20:baseline";

/// Lazily established reference market cap.
pub struct BaselineStore<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    launch_at: DateTime<Utc>,
    init_lock: Mutex<()>,
}

impl<S: KeyValueStore + ?Sized> BaselineStore<S> {
    pub fn new(store: Arc<S>, launch_at: DateTime<Utc>) -> Self {
        Self {
            store,
            launch_at,
            init_lock: Mutex::new(()),
        }
    }

    pub fn load(&self) -> Stored<IndexBaseline> {
        Stored::load(self.store.as_ref(), BASELINE_KEY)
    }

    /// Returns the persisted baseline, creating it from `constituents` on
    /// first use. The new baseline is dated at launch, not at creation.
    pub fn get_or_create(
        &self,
        constituents: &[IndexConstituent],
    ) -> Result<IndexBaseline, StorageError> {
        if let Stored::Present(baseline) = self.load() {
            return Ok(baseline);
        }

        let _guard = self.init_lock.lock();
        // another caller may have won the race while we waited
        if let Stored::Present(baseline) = self.load() {
            return Ok(baseline);
        }

        let baseline = IndexBaseline {
            market_cap: total_market_cap(constituents),
            timestamp: self.launch_at,
        };
        save(self.store.as_ref(), BASELINE_KEY, &baseline)?;
        tracing::info!(
            "✓ Index baseline established: market cap {:.0} ({} constituents)",
            baseline.market_cap,
            constituents.len()
        );
        Ok(baseline)
    }

    /// Drops the baseline only. A full reset that also removes the daily
    /// samples goes through `DailySampler::reset`.
    pub fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.init_lock.lock();
        self.store.delete(BASELINE_KEY)?;
        tracing::warn!("Index baseline cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryStorage;
    use chrono::TimeZone;

    fn launch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn constituents(caps: &[f64]) -> Vec<IndexConstituent> {
        caps.iter()
            .enumerate()
            .map(|(i, cap)| IndexConstituent {
                id: format!("coin-{i}"),
                market_cap: *cap,
                price: 1.0,
                change_24h: None,
                weight: 0.0,
            })
            .collect()
    }

    #[test]
    fn first_call_persists_and_second_returns_same() {
        let store = Arc::new(MemoryStorage::new());
        let baselines = BaselineStore::new(store.clone(), launch());

        let first = baselines.get_or_create(&constituents(&[600.0, 400.0])).unwrap();
        assert_eq!(first.market_cap, 1_000.0);
        assert_eq!(first.timestamp, launch());

        let second = baselines.get_or_create(&constituents(&[5.0])).unwrap();
        assert_eq!(first, second);
        assert!(store.get(BASELINE_KEY).is_some());
    }

    #[test]
    fn corrupt_baseline_is_recreated() {
        let store = Arc::new(MemoryStorage::new());
        store.set(BASELINE_KEY, "{\"market_cap\":".to_string()).unwrap();
        let baselines = BaselineStore::new(store, launch());

        assert_eq!(baselines.load(), Stored::Absent);
        let created = baselines.get_or_create(&constituents(&[250.0])).unwrap();
        assert_eq!(created.market_cap, 250.0);
    }

    #[test]
    fn clear_allows_a_fresh_baseline() {
        let store = Arc::new(MemoryStorage::new());
        let baselines = BaselineStore::new(store.clone(), launch());
        baselines.get_or_create(&constituents(&[100.0])).unwrap();

        baselines.clear().unwrap();
        assert!(store.is_empty());

        let fresh = baselines.get_or_create(&constituents(&[300.0])).unwrap();
        assert_eq!(fresh.market_cap, 300.0);
    }

    #[test]
    fn concurrent_first_access_yields_single_baseline() {
        let store = Arc::new(MemoryStorage::new());
        let baselines = Arc::new(BaselineStore::new(store, launch()));

        let handles: Vec<_> = (1..=8)
            .map(|i| {
                let baselines = baselines.clone();
                std::thread::spawn(move || {
                    baselines.get_or_create(&constituents(&[i as f64 * 100.0])).unwrap()
                })
            })
            .collect();

        let results: Vec<IndexBaseline> = handles.into_iter()
            .map(|h| h.join().unwrap())
            .collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(baselines.load(), Stored::Present(results[0]));
    }
}
