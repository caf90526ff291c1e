use serde::Serialize;
use super::PrivacyTech;

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MarketStats {
    pub coin_count: usize,
    pub total_market_cap: f64,
    pub total_volume: f64,
    pub weighted_change_24h: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TechBreakdown {
    pub tech: PrivacyTech,
    pub coin_count: usize,
    pub market_cap: f64,
}
