use serde::{Deserialize, Deserializer, Serialize};

/// One coin as returned by the markets endpoint at fetch time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinRecord {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub current_price: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub market_cap: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_volume: f64,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default, rename = "price_change_percentage_1h_in_currency")]
    pub price_change_percentage_1h: Option<f64>,
    #[serde(default, rename = "price_change_percentage_7d_in_currency")]
    pub price_change_percentage_7d: Option<f64>,
    #[serde(default)]
    pub sparkline_in_7d: Option<Sparkline>,
}

/// Hourly price samples over the last seven days.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Sparkline {
    #[serde(default)]
    pub price: Vec<f64>,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite()).unwrap_or(0.0))
}

impl CoinRecord {
    pub fn new(id: &str, market_cap: f64, change_24h: Option<f64>) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            symbol: id.to_string(),
            current_price: 0.0,
            market_cap,
            total_volume: 0.0,
            price_change_percentage_24h: change_24h,
            price_change_percentage_1h: None,
            price_change_percentage_7d: None,
            sparkline_in_7d: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.total_volume = volume;
        self
    }

    pub fn history_7d(&self) -> &[f64] {
        self.sparkline_in_7d
            .as_ref()
            .map(|s| s.price.as_slice())
            .unwrap_or(&[])
    }
}
