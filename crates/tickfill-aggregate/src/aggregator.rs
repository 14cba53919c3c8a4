//! Tick-to-OHLCV aggregation.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tickfill_types::{Interval, TradeTick};

use crate::OhlcvBar;

/// Aggregates ticks into OHLCV bars of the given interval.
///
/// Each tick lands in the bucket starting at
/// `floor(timestamp / interval) * interval`. Within a bucket, open and
/// close come from the earliest and latest timestamps (ties keep input
/// order), so the input does not need to be sorted. Bars are returned in
/// ascending time order; intervals without trades produce no bar.
#[must_use]
pub fn aggregate(ticks: &[TradeTick], interval: Interval) -> Vec<OhlcvBar> {
    let mut buckets: BTreeMap<i64, BarBuilder> = BTreeMap::new();

    for tick in ticks {
        buckets
            .entry(interval.bucket_start(tick.timestamp))
            .and_modify(|builder| builder.update(tick))
            .or_insert_with(|| BarBuilder::new(tick));
    }

    buckets
        .into_iter()
        .filter_map(|(start, builder)| {
            DateTime::<Utc>::from_timestamp(start, 0).map(|ts| builder.finish(ts))
        })
        .collect()
}

/// Builder for OHLCV bars.
#[derive(Debug)]
struct BarBuilder {
    open_time: DateTime<Utc>,
    close_time: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    tick_count: u32,
}

impl BarBuilder {
    /// Creates a new builder from the first tick seen in a bucket.
    const fn new(tick: &TradeTick) -> Self {
        Self {
            open_time: tick.timestamp,
            close_time: tick.timestamp,
            open: tick.price,
            high: tick.price,
            low: tick.price,
            close: tick.price,
            volume: tick.size,
            tick_count: 1,
        }
    }

    /// Updates the builder with another tick from the same bucket.
    fn update(&mut self, tick: &TradeTick) {
        if tick.timestamp < self.open_time {
            self.open_time = tick.timestamp;
            self.open = tick.price;
        }
        if tick.timestamp >= self.close_time {
            self.close_time = tick.timestamp;
            self.close = tick.price;
        }
        self.high = self.high.max(tick.price);
        self.low = self.low.min(tick.price);
        self.volume += tick.size;
        self.tick_count += 1;
    }

    /// Finishes building and returns the OHLCV bar.
    const fn finish(self, timestamp: DateTime<Utc>) -> OhlcvBar {
        OhlcvBar::new(
            timestamp,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.tick_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeDelta, TimeZone, Timelike};
    use tickfill_types::Side;

    fn make_tick(hour: u32, minute: u32, second: u32, price: f64, size: f64, side: Side) -> TradeTick {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, second).unwrap();
        TradeTick::new(timestamp, "BTC", price, size, side)
    }

    #[test]
    fn test_minute_aggregation() {
        let ticks = vec![
            make_tick(10, 0, 0, 100.0, 1.0, Side::Buy),
            make_tick(10, 0, 30, 101.0, 2.0, Side::Sell),
            make_tick(10, 1, 10, 99.0, 1.0, Side::Buy),
        ];

        let bars = aggregate(&ticks, Interval::MINUTE);
        assert_eq!(bars.len(), 2);

        let first = bars[0];
        assert_eq!(first.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        assert_relative_eq!(first.open, 100.0);
        assert_relative_eq!(first.high, 101.0);
        assert_relative_eq!(first.low, 100.0);
        assert_relative_eq!(first.close, 101.0);
        assert_relative_eq!(first.volume, 3.0);
        assert_eq!(first.tick_count, 2);

        let second = bars[1];
        assert_eq!(second.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 10, 1, 0).unwrap());
        assert_relative_eq!(second.open, 99.0);
        assert_relative_eq!(second.high, 99.0);
        assert_relative_eq!(second.low, 99.0);
        assert_relative_eq!(second.close, 99.0);
        assert_relative_eq!(second.volume, 1.0);
    }

    #[test]
    fn test_empty_buckets_omitted() {
        let ticks = vec![
            make_tick(10, 0, 0, 100.0, 1.0, Side::Buy),
            make_tick(13, 45, 0, 110.0, 1.0, Side::Buy),
        ];

        let bars = aggregate(&ticks, Interval::new(900).unwrap());
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.hour(), 10);
        assert_eq!(bars[1].timestamp.hour(), 13);
        assert_eq!(bars[1].timestamp.minute(), 45);
    }

    #[test]
    fn test_unsorted_input() {
        let ticks = vec![
            make_tick(10, 0, 40, 105.0, 1.0, Side::Buy),
            make_tick(10, 0, 5, 100.0, 1.0, Side::Buy),
            make_tick(9, 59, 59, 90.0, 1.0, Side::Sell),
            make_tick(10, 0, 20, 97.0, 1.0, Side::Sell),
        ];

        let bars = aggregate(&ticks, Interval::MINUTE);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.minute(), 59);

        let bar = bars[1];
        assert_relative_eq!(bar.open, 100.0);
        assert_relative_eq!(bar.close, 105.0);
        assert_relative_eq!(bar.high, 105.0);
        assert_relative_eq!(bar.low, 97.0);
        assert_eq!(bar.tick_count, 3);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let ticks = vec![
            make_tick(10, 0, 0, 100.0, 1.0, Side::Buy),
            make_tick(10, 0, 0, 102.0, 1.0, Side::Buy),
            make_tick(10, 0, 0, 101.0, 1.0, Side::Sell),
        ];

        let bars = aggregate(&ticks, Interval::HOUR);
        assert_relative_eq!(bars[0].open, 100.0);
        assert_relative_eq!(bars[0].close, 101.0);
    }

    #[test]
    fn test_sub_second_timestamps_floor() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 59).unwrap();
        let tick = TradeTick::new(base + TimeDelta::milliseconds(999), "BTC", 1.0, 1.0, Side::Buy);

        let bars = aggregate(&[tick], Interval::MINUTE);
        assert_eq!(bars[0].timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_bar_bounds_hold() {
        let ticks: Vec<_> = (0..600)
            .map(|i| {
                let price = 100.0 + f64::from((i * 37) % 23) - 11.0;
                make_tick(10 + i / 60, i % 60, (i * 7) % 60, price, 0.1, Side::Buy)
            })
            .collect();

        for interval in Interval::all() {
            for bar in aggregate(&ticks, interval) {
                assert!(bar.low <= bar.open.min(bar.close));
                assert!(bar.high >= bar.open.max(bar.close));
                assert_eq!(bar.timestamp.timestamp() % i64::from(interval.seconds()), 0);
            }
        }
    }

    #[test]
    fn test_volume_conserved() {
        let ticks: Vec<_> = (0..120)
            .map(|i| make_tick(12, i / 2, (i % 2) * 30, 100.0, 0.25, Side::Sell))
            .collect();

        let bars = aggregate(&ticks, Interval::new(300).unwrap());
        let total: f64 = bars.iter().map(|b| b.volume).sum();
        assert_relative_eq!(total, 30.0);
        assert_eq!(bars.iter().map(|b| b.tick_count).sum::<u32>(), 120);
    }

    #[test]
    fn test_no_ticks() {
        assert!(aggregate(&[], Interval::MINUTE).is_empty());
    }
}
