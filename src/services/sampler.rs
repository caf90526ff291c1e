use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use crate::models::{DailyIndexSample, IndexConstituent};
use super::baseline::BaselineStore;
use super::index::IndexCalculator;
use super::storage::{save, KeyValueStore, StorageError, Stored};

/// JSON array of every date that has a sample key.
pub const HISTORY_INDEX_KEY: &str = "anon20:history";
pub const LAST_SAMPLE_KEY: &str = "anon20:last-sample-date";

#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    BeforeLaunch,
    AlreadySampled,
    Recorded(DailyIndexSample),
}

pub fn date_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

pub fn sample_key(date: &str) -> String {
    format!("{HISTORY_INDEX_KEY}:{date}")
}

/// Persists at most one index sample per UTC calendar day, one key per date.
pub struct DailySampler<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    baselines: Arc<BaselineStore<S>>,
    calculator: IndexCalculator,
    lock: Mutex<()>,
}

impl<S: KeyValueStore + ?Sized> DailySampler<S> {
    pub fn new(store: Arc<S>, baselines: Arc<BaselineStore<S>>, calculator: IndexCalculator) -> Self {
        Self {
            store,
            baselines,
            calculator,
            lock: Mutex::new(()),
        }
    }

    pub fn sample(
        &self,
        constituents: &[IndexConstituent],
        now: DateTime<Utc>,
    ) -> Result<SampleOutcome, StorageError> {
        if !self.calculator.is_launched(now) {
            return Ok(SampleOutcome::BeforeLaunch);
        }

        let today = date_key(now);
        let _guard = self.lock.lock();

        // marker is only a shortcut; the per-date key is authoritative
        if Stored::<String>::load(self.store.as_ref(), LAST_SAMPLE_KEY).into_option().as_deref()
            == Some(today.as_str())
        {
            return Ok(SampleOutcome::AlreadySampled);
        }
        if self.stored_sample(&today).is_some() {
            save(self.store.as_ref(), LAST_SAMPLE_KEY, &today)?;
            return Ok(SampleOutcome::AlreadySampled);
        }

        // an empty set must not pin a zero baseline
        let baseline = if constituents.is_empty() {
            self.baselines.load().into_option()
        } else {
            Some(self.baselines.get_or_create(constituents)?)
        };
        let sample = DailyIndexSample {
            date: today.clone(),
            value: self.calculator.value(constituents, baseline.as_ref(), now),
            timestamp: now,
            constituents: constituents.len(),
        };

        // the date index is read right before it is written so nothing
        // removed in the meantime gets written back
        let mut dates = self.dates();
        dates.insert(today.clone());
        save(self.store.as_ref(), &sample_key(&today), &sample)?;
        save(self.store.as_ref(), HISTORY_INDEX_KEY, &dates)?;
        save(self.store.as_ref(), LAST_SAMPLE_KEY, &today)?;

        tracing::info!("📈 Daily index sample {}: {:.4}", sample.date, sample.value);
        Ok(SampleOutcome::Recorded(sample))
    }

    /// All readable samples, oldest first. Corrupt records are skipped.
    pub fn history(&self) -> Vec<DailyIndexSample> {
        self.dates()
            .iter()
            .filter_map(|date| self.stored_sample(date))
            .collect()
    }

    /// Deletes every daily sample and the baseline. Holds the sampling lock
    /// so an in-flight sample cannot write old dates back.
    pub fn reset(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        for date in self.dates() {
            self.store.delete(&sample_key(&date))?;
        }
        self.store.delete(HISTORY_INDEX_KEY)?;
        self.store.delete(LAST_SAMPLE_KEY)?;
        self.baselines.clear()?;
        tracing::warn!("Index baseline and history reset");
        Ok(())
    }

    fn stored_sample(&self, date: &str) -> Option<DailyIndexSample> {
        Stored::load(self.store.as_ref(), &sample_key(date)).into_option()
    }

    fn dates(&self) -> BTreeSet<String> {
        Stored::<BTreeSet<String>>::load(self.store.as_ref(), HISTORY_INDEX_KEY)
            .into_option()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::baseline::BASELINE_KEY;
    use crate::services::storage::MemoryStorage;
    use chrono::{Duration, TimeZone};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn launch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn sampler_over<S: KeyValueStore>(store: Arc<S>) -> DailySampler<S> {
        let baselines = Arc::new(BaselineStore::new(store.clone(), launch()));
        DailySampler::new(store, baselines, IndexCalculator::new(20.0, launch()))
    }

    fn setup() -> (Arc<MemoryStorage>, DailySampler<MemoryStorage>) {
        let store = Arc::new(MemoryStorage::new());
        (store.clone(), sampler_over(store))
    }

    fn constituents(cap: f64) -> Vec<IndexConstituent> {
        vec![IndexConstituent {
            id: "monero".to_string(),
            market_cap: cap,
            price: 150.0,
            change_24h: Some(1.0),
            weight: 1.0,
        }]
    }

    fn dates_of(sampler: &DailySampler<impl KeyValueStore>) -> Vec<String> {
        sampler.history().into_iter().map(|s| s.date).collect()
    }

    #[test]
    fn second_call_same_day_is_noop() {
        let (store, sampler) = setup();
        let morning = launch() + Duration::days(3) + Duration::hours(2);
        let evening = morning + Duration::hours(18);

        let first = sampler.sample(&constituents(1_000.0), morning).unwrap();
        assert!(matches!(first, SampleOutcome::Recorded(_)));
        let snapshot = store.get(&sample_key("2025-01-04"));
        assert!(snapshot.is_some());

        let second = sampler.sample(&constituents(4_000.0), evening).unwrap();
        assert_eq!(second, SampleOutcome::AlreadySampled);
        assert_eq!(store.get(&sample_key("2025-01-04")), snapshot);
        assert_eq!(sampler.history().len(), 1);
    }

    #[test]
    fn existing_date_is_not_overwritten_without_marker() {
        let (store, sampler) = setup();
        let day = launch() + Duration::days(1);
        sampler.sample(&constituents(1_000.0), day).unwrap();

        store.delete(LAST_SAMPLE_KEY).unwrap();
        let outcome = sampler.sample(&constituents(2_000.0), day + Duration::hours(1)).unwrap();
        assert_eq!(outcome, SampleOutcome::AlreadySampled);
        assert_eq!(sampler.history()[0].value, 20.0);
    }

    #[test]
    fn one_sample_per_day_in_date_order() {
        let (_store, sampler) = setup();
        sampler.sample(&constituents(1_000.0), launch() + Duration::hours(1)).unwrap();
        sampler.sample(&constituents(1_500.0), launch() + Duration::days(1)).unwrap();
        sampler.sample(&constituents(500.0), launch() + Duration::days(2)).unwrap();

        let history = sampler.history();
        assert_eq!(dates_of(&sampler), vec!["2025-01-01", "2025-01-02", "2025-01-03"]);
        assert_eq!(history[1].value, 30.0);
        assert_eq!(history[2].value, 10.0);
    }

    #[test]
    fn empty_day_records_base_without_baseline() {
        let (store, sampler) = setup();
        let outcome = sampler.sample(&[], launch() + Duration::days(1)).unwrap();
        match outcome {
            SampleOutcome::Recorded(sample) => {
                assert_eq!(sample.value, 20.0);
                assert_eq!(sample.constituents, 0);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(store.get(BASELINE_KEY).is_none());
    }

    #[test]
    fn nothing_recorded_before_launch() {
        let (store, sampler) = setup();
        let outcome = sampler.sample(&constituents(1_000.0), launch() - Duration::days(1)).unwrap();
        assert_eq!(outcome, SampleOutcome::BeforeLaunch);
        assert!(store.is_empty());
    }

    #[test]
    fn reset_removes_samples_and_baseline() {
        let (store, sampler) = setup();
        sampler.sample(&constituents(1_000.0), launch() + Duration::days(1)).unwrap();
        sampler.sample(&constituents(1_000.0), launch() + Duration::days(2)).unwrap();

        sampler.reset().unwrap();
        assert!(store.is_empty());
        assert!(sampler.history().is_empty());

        let again = sampler.sample(&constituents(3_000.0), launch() + Duration::days(2)).unwrap();
        assert!(matches!(again, SampleOutcome::Recorded(s) if s.value == 20.0));
    }

    /// Wipes all index state the first time the baseline is read after arming,
    /// landing between the per-date check and the history write.
    struct WipingStore {
        inner: MemoryStorage,
        armed: AtomicBool,
    }

    impl KeyValueStore for WipingStore {
        fn get(&self, key: &str) -> Option<String> {
            if key == BASELINE_KEY && self.armed.swap(false, Ordering::SeqCst) {
                for date in Stored::<BTreeSet<String>>::load(&self.inner, HISTORY_INDEX_KEY)
                    .into_option()
                    .unwrap_or_default()
                {
                    self.inner.delete(&sample_key(&date)).unwrap();
                }
                for key in [HISTORY_INDEX_KEY, LAST_SAMPLE_KEY, BASELINE_KEY] {
                    self.inner.delete(key).unwrap();
                }
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
            self.inner.set(key, value)
        }

        fn delete(&self, key: &str) -> Result<(), StorageError> {
            self.inner.delete(key)
        }
    }

    #[test]
    fn wipe_during_sampling_is_not_undone() {
        let store = Arc::new(WipingStore {
            inner: MemoryStorage::new(),
            armed: AtomicBool::new(false),
        });
        let sampler = sampler_over(store.clone());

        sampler.sample(&constituents(1_000.0), launch() + Duration::days(1)).unwrap();
        store.armed.store(true, Ordering::SeqCst);
        sampler.sample(&constituents(1_000.0), launch() + Duration::days(2)).unwrap();

        assert_eq!(dates_of(&sampler), vec!["2025-01-03"]);
        assert!(store.get(&sample_key("2025-01-02")).is_none());
    }

    #[test]
    fn corrupt_marker_is_ignored() {
        let (store, sampler) = setup();
        let day = launch() + Duration::days(1);
        sampler.sample(&constituents(1_000.0), day).unwrap();

        store.set(LAST_SAMPLE_KEY, "2025-01-02".to_string()).unwrap();
        let same_day = sampler.sample(&constituents(9_000.0), day + Duration::hours(3)).unwrap();
        assert_eq!(same_day, SampleOutcome::AlreadySampled);
        assert_eq!(sampler.history()[0].value, 20.0);

        store.set(LAST_SAMPLE_KEY, "{".to_string()).unwrap();
        let next_day = sampler.sample(&constituents(2_000.0), day + Duration::days(1)).unwrap();
        assert!(matches!(next_day, SampleOutcome::Recorded(s) if s.value == 40.0));
    }

    #[test]
    fn corrupt_sample_is_absent_and_rederived() {
        let (store, sampler) = setup();
        sampler.sample(&constituents(1_000.0), launch() + Duration::days(1)).unwrap();
        sampler.sample(&constituents(1_000.0), launch() + Duration::days(2)).unwrap();

        store.set(&sample_key("2025-01-02"), "not a sample".to_string()).unwrap();
        store.delete(LAST_SAMPLE_KEY).unwrap();
        assert_eq!(dates_of(&sampler), vec!["2025-01-03"]);

        let redo = sampler.sample(&constituents(1_500.0), launch() + Duration::days(1)).unwrap();
        assert!(matches!(redo, SampleOutcome::Recorded(s) if s.value == 30.0));
        assert_eq!(dates_of(&sampler), vec!["2025-01-02", "2025-01-03"]);
    }

    #[test]
    fn corrupt_date_index_keeps_existing_records() {
        let (store, sampler) = setup();
        let day = launch() + Duration::days(1);
        sampler.sample(&constituents(1_000.0), day).unwrap();
        let kept = store.get(&sample_key("2025-01-02"));

        store.set(HISTORY_INDEX_KEY, "[\"2025-01".to_string()).unwrap();
        assert!(sampler.history().is_empty());

        store.delete(LAST_SAMPLE_KEY).unwrap();
        let same_day = sampler.sample(&constituents(5_000.0), day).unwrap();
        assert_eq!(same_day, SampleOutcome::AlreadySampled);
        assert_eq!(store.get(&sample_key("2025-01-02")), kept);

        sampler.sample(&constituents(1_000.0), day + Duration::days(1)).unwrap();
        assert_eq!(dates_of(&sampler), vec!["2025-01-03"]);
        assert_eq!(store.get(&sample_key("2025-01-02")), kept);
    }
}
