pub mod chart;
pub mod format;

pub use chart::{nice_ticks, resample};
pub use format::{format_percent, format_price, format_usd_compact};
