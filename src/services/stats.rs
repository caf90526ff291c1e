use std::collections::HashMap;
use crate::models::{privacy, CoinRecord, MarketStats, PrivacyTech, TechBreakdown};
use super::index::weighted_change;

fn usable(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Whole-market totals over every fetched coin, not just index members.
pub fn market_stats(coins: &[CoinRecord]) -> MarketStats {
    MarketStats {
        coin_count: coins.len(),
        total_market_cap: coins.iter().map(|c| usable(c.market_cap)).sum(),
        total_volume: coins.iter().map(|c| usable(c.total_volume)).sum(),
        weighted_change_24h: weighted_change(
            coins.iter().map(|c| (c.market_cap, c.price_change_percentage_24h)),
        ),
    }
}

/// Coin count and market cap per privacy technology, largest first.
pub fn tech_breakdown(coins: &[CoinRecord]) -> Vec<TechBreakdown> {
    let mut by_tech: HashMap<PrivacyTech, TechBreakdown> = HashMap::new();
    for coin in coins {
        let tech = privacy::lookup(&coin.id).tech;
        let entry = by_tech.entry(tech).or_insert(TechBreakdown {
            tech,
            coin_count: 0,
            market_cap: 0.0,
        });
        entry.coin_count += 1;
        entry.market_cap += usable(coin.market_cap);
    }

    let mut out: Vec<TechBreakdown> = by_tech.into_values().collect();
    out.sort_by(|a, b| {
        b.market_cap
            .total_cmp(&a.market_cap)
            .then_with(|| b.coin_count.cmp(&a.coin_count))
            .then_with(|| a.tech.to_string().cmp(&b.tech.to_string()))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_change_over_full_list() {
        let coins = vec![
            CoinRecord::new("a", 100.0, Some(10.0)).with_volume(5.0),
            CoinRecord::new("b", 300.0, Some(-2.0)).with_volume(7.0),
        ];
        let stats = market_stats(&coins);
        assert_eq!(stats.coin_count, 2);
        assert_eq!(stats.total_market_cap, 400.0);
        assert_eq!(stats.total_volume, 12.0);
        assert!((stats.weighted_change_24h - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_and_zero_cap_lists_degrade_to_zero() {
        assert_eq!(market_stats(&[]), MarketStats::default());

        let zero = vec![CoinRecord::new("a", 0.0, Some(50.0))];
        let stats = market_stats(&zero);
        assert_eq!(stats.total_market_cap, 0.0);
        assert_eq!(stats.weighted_change_24h, 0.0);
        assert!(!stats.weighted_change_24h.is_nan());
    }

    #[test]
    fn breakdown_groups_by_technology() {
        let coins = vec![
            CoinRecord::new("monero", 3_000.0, None),
            CoinRecord::new("zano", 200.0, None),
            CoinRecord::new("zcash", 700.0, None),
            CoinRecord::new("bitcoin", 10.0, None),
        ];
        let breakdown = tech_breakdown(&coins);
        assert_eq!(breakdown[0].tech, PrivacyTech::RingSignatures);
        assert_eq!(breakdown[0].coin_count, 2);
        assert_eq!(breakdown[0].market_cap, 3_200.0);
        assert_eq!(breakdown[1].tech, PrivacyTech::ZeroKnowledge);
        assert_eq!(breakdown.last().unwrap().tech, PrivacyTech::Unknown);
    }
}
