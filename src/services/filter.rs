use std::cmp::Ordering;
use crate::models::{privacy, CoinRecord, IndexConstituent, PrivacyLevel};

#[derive(Clone)]
pub struct ConstituentSelector {
    max_constituents: usize,
}

impl ConstituentSelector {
    pub fn new(max_constituents: usize) -> Self {
        Self { max_constituents }
    }

    /// High-privacy coin with a usable market cap.
    pub fn is_eligible(&self, coin: &CoinRecord) -> bool {
        if !(coin.market_cap.is_finite() && coin.market_cap > 0.0) {
            tracing::trace!("    skip {}: no market cap", coin.id);
            return false;
        }
        privacy::lookup(&coin.id).level == PrivacyLevel::High
    }

    /// Top-N eligible coins by market cap, descending, with weights attached.
    pub fn select(&self, coins: &[CoinRecord]) -> Vec<IndexConstituent> {
        let mut eligible: Vec<&CoinRecord> = coins.iter()
            .filter(|c| self.is_eligible(c))
            .collect();

        // sort_by is stable, so equal caps keep input order
        eligible.sort_by(|a, b| {
            b.market_cap.partial_cmp(&a.market_cap).unwrap_or(Ordering::Equal)
        });
        eligible.truncate(self.max_constituents);

        let total: f64 = eligible.iter().map(|c| c.market_cap).sum();

        eligible.into_iter()
            .map(|c| IndexConstituent {
                id: c.id.clone(),
                market_cap: c.market_cap,
                price: c.current_price,
                change_24h: c.price_change_percentage_24h,
                weight: if total > 0.0 { c.market_cap / total } else { 0.0 },
            })
            .collect()
    }
}
