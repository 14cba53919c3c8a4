//! Remote archive resource addressing.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Location of a remote archive resource.
///
/// Addresses are deterministic functions of market and date granularity.
/// They are used to build request URLs and as cache keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceAddress {
    /// Year-level directory.
    Year {
        /// Market symbol.
        market: String,
        /// Calendar year.
        year: i32,
    },
    /// Month-level directory.
    Month {
        /// Market symbol.
        market: String,
        /// Calendar year.
        year: i32,
        /// Month (1-12).
        month: u32,
    },
    /// Day-level trade archive.
    ///
    /// The day is not validated against the month length, so addresses such
    /// as February 30 can be probed and simply resolve to non-existence.
    Day {
        /// Market symbol.
        market: String,
        /// Calendar year.
        year: i32,
        /// Month (1-12).
        month: u32,
        /// Day of month (1-31).
        day: u32,
    },
}

impl ResourceAddress {
    /// Address of a year directory.
    #[must_use]
    pub fn year(market: impl Into<String>, year: i32) -> Self {
        Self::Year {
            market: market.into(),
            year,
        }
    }

    /// Address of a month directory.
    #[must_use]
    pub fn month(market: impl Into<String>, year: i32, month: u32) -> Self {
        Self::Month {
            market: market.into(),
            year,
            month,
        }
    }

    /// Address of a day archive.
    #[must_use]
    pub fn day(market: impl Into<String>, year: i32, month: u32, day: u32) -> Self {
        Self::Day {
            market: market.into(),
            year,
            month,
            day,
        }
    }

    /// Address of the archive for a calendar date.
    #[must_use]
    pub fn for_date(market: impl Into<String>, date: NaiveDate) -> Self {
        Self::day(market, date.year(), date.month(), date.day())
    }

    /// Returns the market symbol.
    #[must_use]
    pub fn market(&self) -> &str {
        match self {
            Self::Year { market, .. } | Self::Month { market, .. } | Self::Day { market, .. } => {
                market
            }
        }
    }

    /// Returns the calendar date for day addresses that name a real date.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        match *self {
            Self::Day {
                year, month, day, ..
            } => NaiveDate::from_ymd_opt(year, month, day),
            _ => None,
        }
    }

    /// Returns true if this addresses a day archive rather than a directory.
    #[must_use]
    pub const fn is_archive(&self) -> bool {
        matches!(self, Self::Day { .. })
    }

    /// Returns the path of this resource relative to the trades root.
    ///
    /// Directories end with `/`; day archives are
    /// `{market}/{year}/{month:02}/{year}{month:02}{day:02}_{market}.csv.gz`.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Year { market, year } => format!("{market}/{year}/"),
            Self::Month {
                market,
                year,
                month,
            } => format!("{market}/{year}/{month:02}/"),
            Self::Day {
                market,
                year,
                month,
                day,
            } => format!("{market}/{year}/{month:02}/{year}{month:02}{day:02}_{market}.csv.gz"),
        }
    }

    /// Returns a deterministic, filesystem-safe key for caching.
    ///
    /// Market bytes other than ASCII alphanumerics and `_` are written as
    /// `~{byte:02x}`, so distinct addresses never share a key.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let sanitize = |market: &str| {
            market.bytes().fold(String::with_capacity(market.len()), |mut key, b| {
                if b.is_ascii_alphanumeric() || b == b'_' {
                    key.push(char::from(b));
                } else {
                    key.push_str(&format!("~{b:02x}"));
                }
                key
            })
        };
        match self {
            Self::Year { market, year } => format!("{}-{year}", sanitize(market)),
            Self::Month {
                market,
                year,
                month,
            } => format!("{}-{year}{month:02}", sanitize(market)),
            Self::Day {
                market,
                year,
                month,
                day,
            } => format!("{}-{year}{month:02}{day:02}", sanitize(market)),
        }
    }
}

impl std::fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}
