use chrono::{DateTime, Utc};
use crate::config::IndexConfig;
use crate::models::{IndexBaseline, IndexConstituent};

/// Market-cap weighted index anchored to a fixed base value.
#[derive(Debug, Clone)]
pub struct IndexCalculator {
    base_value: f64,
    launch_at: DateTime<Utc>,
}

impl IndexCalculator {
    pub fn new(base_value: f64, launch_at: DateTime<Utc>) -> Self {
        Self { base_value, launch_at }
    }

    pub fn from_config(config: &IndexConfig) -> Self {
        Self::new(config.base_value, config.launch_at)
    }

    pub fn is_launched(&self, now: DateTime<Utc>) -> bool {
        now >= self.launch_at
    }

    /// `base × current_total / baseline`, falling back to `base` whenever
    /// the ratio is undefined or the index has not launched.
    pub fn value(
        &self,
        constituents: &[IndexConstituent],
        baseline: Option<&IndexBaseline>,
        now: DateTime<Utc>,
    ) -> f64 {
        if !self.is_launched(now) || constituents.is_empty() {
            return self.base_value;
        }
        let Some(baseline) = baseline else {
            return self.base_value;
        };
        if !(baseline.market_cap.is_finite() && baseline.market_cap > 0.0) {
            return self.base_value;
        }

        let value = self.base_value * (total_market_cap(constituents) / baseline.market_cap);
        if value.is_finite() && value >= 0.0 {
            value
        } else {
            self.base_value
        }
    }

    /// Cap-weighted 24h change of the constituents; 0 before launch.
    pub fn change_24h(&self, constituents: &[IndexConstituent], now: DateTime<Utc>) -> f64 {
        if !self.is_launched(now) {
            return 0.0;
        }
        weighted_change(constituents.iter().map(|c| (c.market_cap, c.change_24h)))
    }
}

pub fn total_market_cap(constituents: &[IndexConstituent]) -> f64 {
    constituents.iter().map(|c| c.market_cap).sum()
}

/// Σ cap·chg / Σ cap over `(cap, chg)` pairs. Missing changes count as 0
/// but their cap still weighs in the denominator.
pub fn weighted_change<I>(items: I) -> f64
where
    I: IntoIterator<Item = (f64, Option<f64>)>,
{
    let mut num = 0.0;
    let mut den = 0.0;
    for (cap, change) in items {
        if !(cap.is_finite() && cap > 0.0) {
            continue;
        }
        let change = change.filter(|c| c.is_finite()).unwrap_or(0.0);
        num += cap * change;
        den += cap;
    }
    if den > 0.0 { num / den } else { 0.0 }
}
