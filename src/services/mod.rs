pub mod baseline;
pub mod cache;
pub mod collector;
pub mod filter;
pub mod index;
pub mod sampler;
pub mod stats;
pub mod storage;

pub use baseline::BaselineStore;
pub use cache::CoinCache;
pub use collector::CoinCollector;
pub use filter::ConstituentSelector;
pub use index::IndexCalculator;
pub use sampler::{DailySampler, SampleOutcome};
pub use stats::{market_stats, tech_breakdown};
pub use storage::{KeyValueStore, LocalStorage, MemoryStorage, StorageError, Stored};
