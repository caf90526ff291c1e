pub mod coin;
pub mod index;
pub mod privacy;
pub mod stats;

pub use coin::{CoinRecord, Sparkline};
pub use index::{DailyIndexSample, IndexBaseline, IndexConstituent, IndexSnapshot};
pub use privacy::{PrivacyLevel, PrivacyMetadata, PrivacyTech};
pub use stats::{MarketStats, TechBreakdown};
