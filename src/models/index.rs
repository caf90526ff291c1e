use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A coin narrowed to what the weighted index needs.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndexConstituent {
    pub id: String,
    pub market_cap: f64,
    pub price: f64,
    pub change_24h: Option<f64>,
    /// Share of total constituent market cap.
    pub weight: f64,
}

/// Reference total market cap every index value is normalized against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IndexBaseline {
    pub market_cap: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyIndexSample {
    /// UTC calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub constituents: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexSnapshot {
    pub value: f64,
    pub change_24h: f64,
    pub constituents: Vec<IndexConstituent>,
    pub baseline: Option<IndexBaseline>,
    pub launched: bool,
}
