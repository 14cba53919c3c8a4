//! OHLCV (candlestick) data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar (candlestick) data.
///
/// Bars only exist for intervals containing at least one trade, so
/// `low <= open, close <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    /// Bar open time (start of the interval, aligned to the interval length).
    pub timestamp: DateTime<Utc>,
    /// Price of the chronologically first trade.
    pub open: f64,
    /// Highest traded price.
    pub high: f64,
    /// Lowest traded price.
    pub low: f64,
    /// Price of the chronologically last trade.
    pub close: f64,
    /// Sum of traded sizes.
    pub volume: f64,
    /// Number of trades in the bar.
    pub tick_count: u32,
}

impl OhlcvBar {
    /// Creates a new OHLCV bar.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        tick_count: u32,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            tick_count,
        }
    }
}
