use std::sync::Arc;
use chrono::{DateTime, Utc};
use crate::config::IndexConfig;
use crate::models::{CoinRecord, DailyIndexSample, IndexSnapshot};
use crate::services::{
    BaselineStore, ConstituentSelector, DailySampler, IndexCalculator, KeyValueStore,
    SampleOutcome, StorageError,
};

/// Selector, baseline, calculator and sampler over one injected store.
pub struct IndexEngine<S: KeyValueStore + ?Sized> {
    selector: ConstituentSelector,
    calculator: IndexCalculator,
    baselines: Arc<BaselineStore<S>>,
    sampler: DailySampler<S>,
}

impl<S: KeyValueStore + ?Sized> IndexEngine<S> {
    pub fn new(config: &IndexConfig, store: Arc<S>) -> Self {
        let calculator = IndexCalculator::from_config(config);
        let baselines = Arc::new(BaselineStore::new(store.clone(), config.launch_at));
        let sampler = DailySampler::new(store, baselines.clone(), calculator.clone());

        Self {
            selector: ConstituentSelector::new(config.max_constituents),
            calculator,
            baselines,
            sampler,
        }
    }

    /// Never fails: a storage error only costs the baseline, which makes
    /// the value fall back to the base.
    pub fn snapshot(&self, coins: &[CoinRecord], now: DateTime<Utc>) -> IndexSnapshot {
        let constituents = self.selector.select(coins);
        let launched = self.calculator.is_launched(now);

        let baseline = if launched && !constituents.is_empty() {
            match self.baselines.get_or_create(&constituents) {
                Ok(baseline) => Some(baseline),
                Err(e) => {
                    tracing::warn!("Baseline unavailable: {}", e);
                    None
                }
            }
        } else {
            self.baselines.load().into_option()
        };

        IndexSnapshot {
            value: self.calculator.value(&constituents, baseline.as_ref(), now),
            change_24h: self.calculator.change_24h(&constituents, now),
            constituents,
            baseline,
            launched,
        }
    }

    pub fn record_daily(
        &self,
        coins: &[CoinRecord],
        now: DateTime<Utc>,
    ) -> Result<SampleOutcome, StorageError> {
        let constituents = self.selector.select(coins);
        self.sampler.sample(&constituents, now)
    }

    pub fn history(&self) -> Vec<DailyIndexSample> {
        self.sampler.history()
    }

    /// Deletes the baseline and every daily sample.
    pub fn reset(&self) -> Result<(), StorageError> {
        self.sampler.reset()
    }
}
