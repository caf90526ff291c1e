use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Client, StatusCode};
use std::time::Duration;
use crate::config::ProviderConfig;
use crate::models::CoinRecord;
use super::{CoinSource, SourceError};

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

pub struct CoinGecko {
    client: Client,
    base_url: String,
    category: String,
    per_page: u32,
    api_key: Option<String>,
}

impl CoinGecko {
    pub fn new(config: &ProviderConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            category: config.category.clone(),
            per_page: config.per_page,
            api_key: config.api_key.clone(),
        })
    }

    fn markets_url(&self) -> String {
        format!(
            "{}/coins/markets?vs_currency=usd&category={}&order=market_cap_desc&per_page={}&page=1&sparkline=true&price_change_percentage=1h,24h,7d",
            self.base_url, self.category, self.per_page
        )
    }
}

/// `Retry-After` in delta-seconds form; HTTP-date values are ignored.
fn parse_retry_after(value: Option<&reqwest::header::HeaderValue>) -> Option<Duration> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[async_trait]
impl CoinSource for CoinGecko {
    fn name(&self) -> &'static str {
        "CoinGecko"
    }

    async fn fetch_markets(&self) -> Result<Vec<CoinRecord>, SourceError> {
        let mut request = self.client.get(self.markets_url())
            .header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(resp.headers().get(RETRY_AFTER));
            return Err(SourceError::RateLimited { retry_after });
        }

        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let coins: Vec<CoinRecord> = resp.json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        tracing::debug!("{} returned {} coins", self.name(), coins.len());
        Ok(coins)
    }
}
