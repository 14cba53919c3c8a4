//! Fetch windows and day iteration.

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Interval};

/// A market, day range, and bar interval for one backfill run.
///
/// The end date is exclusive: a window ending today covers every day up to
/// and including yesterday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchWindow {
    /// Market symbol.
    pub market: String,
    /// First day to fetch (inclusive).
    pub start: NaiveDate,
    /// Day after the last day to fetch (exclusive).
    pub end: NaiveDate,
    /// Bar interval, or `None` for raw ticks.
    pub interval: Option<Interval>,
}

impl FetchWindow {
    /// Creates a new fetch window, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(
        market: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        interval: Option<Interval>,
    ) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvalidWindow { start, end });
        }
        Ok(Self {
            market: market.into(),
            start,
            end,
            interval,
        })
    }

    /// Returns an iterator over every day in `[start, end)`.
    #[must_use]
    pub const fn days(&self) -> DayIterator {
        DayIterator::new(self.start, self.end)
    }

    /// Returns the number of days in the window.
    #[must_use]
    pub fn total_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days()).unwrap_or(0)
    }

    /// Returns true if the window covers no days.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns true if the window contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

impl std::fmt::Display for FetchWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} to {} (exclusive)", self.market, self.start, self.end)?;
        if let Some(interval) = self.interval {
            write!(f, " @ {interval}")?;
        }
        Ok(())
    }
}

/// Iterator over the days of a half-open date range.
#[derive(Debug, Clone)]
pub struct DayIterator {
    current: NaiveDate,
    end: NaiveDate,
}

impl DayIterator {
    const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            current: start,
            end,
        }
    }
}

impl Iterator for DayIterator {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.end {
            return None;
        }

        let result = self.current;
        self.current = self.current.succ_opt()?;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let days = usize::try_from((self.end - self.current).num_days()).unwrap_or(0);
        (days, Some(days))
    }
}

impl ExactSizeIterator for DayIterator {}

/// Which calendar decides "today" when computing the end of a backfill.
///
/// Today's archive is never final, so the backfill stops at the day before
/// the date this resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateCutoff {
    /// Current date in UTC.
    #[default]
    Utc,
    /// Current date in the system's local time zone.
    Local,
    /// A fixed date, for reproducible runs.
    Fixed(NaiveDate),
}

impl DateCutoff {
    /// Returns the date treated as today.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        match self {
            Self::Utc => Utc::now().date_naive(),
            Self::Local => Local::now().date_naive(),
            Self::Fixed(date) => *date,
        }
    }
}

impl std::str::FromStr for DateCutoff {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
                .map(Self::Fixed)
                .map_err(|_| format!("invalid cutoff '{s}', expected utc, local, or YYYY-MM-DD")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_new() {
        let window = FetchWindow::new("BTC", date(2024, 1, 1), date(2024, 1, 31), None).unwrap();
        assert_eq!(window.start, date(2024, 1, 1));
        assert_eq!(window.end, date(2024, 1, 31));
        assert_eq!(window.total_days(), 30);
    }

    #[test]
    fn test_window_invalid() {
        let result = FetchWindow::new("BTC", date(2024, 1, 31), date(2024, 1, 1), None);
        assert!(matches!(result, Err(ConfigError::InvalidWindow { .. })));
    }

    #[test]
    fn test_empty_window() {
        let window = FetchWindow::new("BTC", date(2024, 1, 1), date(2024, 1, 1), None).unwrap();
        assert!(window.is_empty());
        assert_eq!(window.days().count(), 0);
    }

    #[test]
    fn test_days_exclude_end() {
        let window = FetchWindow::new("BTC", date(2024, 2, 27), date(2024, 3, 2), None).unwrap();
        let days: Vec<_> = window.days().collect();

        assert_eq!(
            days,
            vec![date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
        );
        assert_eq!(window.days().len(), 4);
        assert!(!window.contains(date(2024, 3, 2)));
    }

    #[test]
    fn test_cutoff_fixed() {
        let cutoff = DateCutoff::Fixed(date(2024, 6, 1));
        assert_eq!(cutoff.today(), date(2024, 6, 1));
    }

    #[test]
    fn test_cutoff_parse() {
        assert_eq!("UTC".parse::<DateCutoff>().unwrap(), DateCutoff::Utc);
        assert_eq!("local".parse::<DateCutoff>().unwrap(), DateCutoff::Local);
        assert_eq!(
            "2024-06-01".parse::<DateCutoff>().unwrap(),
            DateCutoff::Fixed(date(2024, 6, 1))
        );
        assert!("tomorrow".parse::<DateCutoff>().is_err());
    }
}
