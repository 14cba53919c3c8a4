//! OHLCV bar interval definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ConfigError;

/// Seconds in one hour. Every interval must divide it evenly.
const HOUR_SECONDS: u32 = 3600;

/// OHLCV bar length in seconds.
///
/// An interval always divides one hour evenly, so bars align to hour
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Interval(u32);

impl Interval {
    /// One-second bars.
    pub const SECOND: Self = Self(1);
    /// One-minute bars.
    pub const MINUTE: Self = Self(60);
    /// One-hour bars.
    pub const HOUR: Self = Self(HOUR_SECONDS);

    /// Creates an interval, validating that it evenly divides 3600.
    ///
    /// # Errors
    ///
    /// Returns an error if `seconds` is zero or does not divide one hour.
    pub const fn new(seconds: u32) -> Result<Self, ConfigError> {
        if seconds == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if HOUR_SECONDS % seconds != 0 {
            return Err(ConfigError::IntervalNotDivisor(seconds));
        }
        Ok(Self(seconds))
    }

    /// Validates an optional interval; `None` means raw ticks.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is present and invalid.
    pub fn from_optional(seconds: Option<u32>) -> Result<Option<Self>, ConfigError> {
        seconds.map(Self::new).transpose()
    }

    /// Returns the interval length in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        self.0
    }

    /// Returns the start of the bucket containing `timestamp`, as Unix seconds.
    ///
    /// Computed as `floor(ts / seconds) * seconds`, flooring toward negative
    /// infinity for pre-epoch timestamps.
    #[must_use]
    pub fn bucket_start(&self, timestamp: DateTime<Utc>) -> i64 {
        let width = i64::from(self.0);
        timestamp.timestamp().div_euclid(width) * width
    }

    /// Returns every valid interval in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=HOUR_SECONDS).filter_map(|s| Self::new(s).ok())
    }
}

impl TryFrom<u32> for Interval {
    type Error = ConfigError;

    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        Self::new(seconds)
    }
}

impl From<Interval> for u32 {
    fn from(interval: Interval) -> Self {
        interval.0
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            HOUR_SECONDS => write!(f, "1h"),
            s if s % 60 == 0 => write!(f, "{}m", s / 60),
            s => write!(f, "{s}s"),
        }
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let (digits, multiplier) = match lower.as_bytes().last() {
            Some(b's') => (&lower[..lower.len() - 1], 1),
            Some(b'm') => (&lower[..lower.len() - 1], 60),
            Some(b'h') => (&lower[..lower.len() - 1], HOUR_SECONDS),
            _ => (lower.as_str(), 1),
        };

        let count: u32 = digits
            .parse()
            .map_err(|_| IntervalParseError::Syntax(s.to_string()))?;
        let seconds = count
            .checked_mul(multiplier)
            .ok_or_else(|| IntervalParseError::Syntax(s.to_string()))?;

        Self::new(seconds).map_err(IntervalParseError::Invalid)
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntervalParseError {
    /// Not a number of seconds or a suffixed duration.
    Syntax(String),
    /// Well-formed but does not evenly divide one hour.
    Invalid(ConfigError),
}

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(s) => write!(
                f,
                "invalid interval '{s}', expected seconds (e.g. 60) or a duration like 30s, 5m, 1h"
            ),
            Self::Invalid(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for IntervalParseError {}
