//! CSV trade parsing and normalization.

use chrono::{DateTime, NaiveDateTime, Utc};
use csv_async::{AsyncReaderBuilder, Trim};
use futures::StreamExt;
use serde::Deserialize;
use thiserror::Error;
use tickfill_types::{Side, TradeTick};

/// Naive timestamp layouts, interpreted as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Errors that can occur during trade parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Malformed CSV or a missing column.
    #[error("CSV error: {0}")]
    Csv(#[from] csv_async::Error),

    /// Unparseable timestamp.
    #[error("Invalid timestamp '{value}' on line {line}")]
    Timestamp {
        /// 1-based line number including the header.
        line: usize,
        /// The raw timestamp text.
        value: String,
    },

    /// Non-positive or non-finite price or size.
    #[error("Invalid {field} {value} on line {line}")]
    InvalidValue {
        /// 1-based line number including the header.
        line: usize,
        /// Column name.
        field: &'static str,
        /// The parsed value.
        value: f64,
    },
}

/// One day of normalized trades.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDay {
    /// Trades in file order.
    pub ticks: Vec<TradeTick>,
    /// Rows whose side was neither `BUY` nor `SELL` (counted as sells).
    pub unrecognized_sides: usize,
}

/// A trade row as published, matched to columns by header name.
#[derive(Debug, Deserialize)]
struct RawTrade {
    symbol: String,
    side: String,
    size: f64,
    price: f64,
    timestamp: String,
}

/// Parses a decompressed daily trade archive.
///
/// Expects a header row naming at least `symbol, side, size, price,
/// timestamp` (in any order; other columns are ignored). Each row is
/// normalized into a [`TradeTick`]: `symbol` becomes the market, price and
/// size are `f64`, the timestamp is parsed as UTC, and the side is `BUY` or
/// otherwise sell.
///
/// # Errors
///
/// Returns an error if the CSV is malformed, a timestamp cannot be parsed,
/// or a price or size is not a positive finite number.
pub async fn parse_trades(data: &[u8]) -> Result<ParsedDay, ParseError> {
    let mut reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .create_deserializer(data);
    let mut records = reader.deserialize::<RawTrade>();

    let mut day = ParsedDay::default();
    let mut line = 1;

    while let Some(record) = records.next().await {
        line += 1;
        let raw = record?;

        let timestamp = parse_timestamp(&raw.timestamp).ok_or_else(|| ParseError::Timestamp {
            line,
            value: raw.timestamp.clone(),
        })?;
        check_positive(line, "price", raw.price)?;
        check_positive(line, "size", raw.size)?;

        if !Side::is_recognized(&raw.side) {
            day.unrecognized_sides += 1;
        }

        day.ticks.push(TradeTick::new(
            timestamp,
            raw.symbol,
            raw.price,
            raw.size,
            Side::from_exchange(&raw.side),
        ));
    }

    Ok(day)
}

/// Parses an archive timestamp as UTC.
///
/// Accepts RFC 3339 (any offset, converted to UTC) and naive
/// `YYYY-MM-DD HH:MM:SS[.fff]` with a space or `T` separator.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn check_positive(line: usize, field: &'static str, value: f64) -> Result<(), ParseError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParseError::InvalidValue { line, field, value })
    }
}
