pub mod gecko;

use async_trait::async_trait;
use std::time::Duration;
use crate::models::CoinRecord;

pub use gecko::CoinGecko;

#[async_trait]
pub trait CoinSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_markets(&self) -> Result<Vec<CoinRecord>, SourceError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unexpected status: {0}")]
    Status(u16),
}

impl SourceError {
    /// Whether a later attempt may succeed without any change on our side.
    pub fn is_transient(&self) -> bool {
        matches!(self, SourceError::RateLimited { .. } | SourceError::Network(_))
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SourceError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}
