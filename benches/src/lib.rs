//! Benchmark fixtures for tickfill.

use chrono::{DateTime, TimeDelta, Utc};
use tickfill_lib::{Side, TradeTick};

/// Midnight UTC on 2021-01-01.
const DAY_START: i64 = 1_609_459_200;

/// One synthetic trading day with a trade every `step_ms` milliseconds.
///
/// Prices cycle through a narrow band and every third trade is a sell, so
/// bars see realistic high/low churn.
pub fn synthetic_day(market: &str, step_ms: i64) -> Vec<TradeTick> {
    let start = DateTime::<Utc>::from_timestamp(DAY_START, 0).unwrap_or_default();
    let count = 86_400_000 / step_ms.max(1);
    (0..count)
        .map(|i| {
            let side = if i % 3 == 0 { Side::Sell } else { Side::Buy };
            let price = 3_000_000.0 + (i % 500) as f64;
            TradeTick::new(start + TimeDelta::milliseconds(i * step_ms), market, price, 0.01, side)
        })
        .collect()
}
