//! Backfill output series.

use tickfill_aggregate::OhlcvBar;
use tickfill_types::{Interval, TradeTick};

/// A chronological series of raw ticks or aggregated bars.
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    /// Raw trade ticks.
    Ticks(Vec<TradeTick>),
    /// OHLCV bars.
    Bars(Vec<OhlcvBar>),
}

impl Series {
    /// Returns the empty series matching an interval choice.
    #[must_use]
    pub const fn empty(interval: Option<Interval>) -> Self {
        match interval {
            Some(_) => Self::Bars(Vec::new()),
            None => Self::Ticks(Vec::new()),
        }
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ticks(ticks) => ticks.len(),
            Self::Bars(bars) => bars.len(),
        }
    }

    /// Returns true if the series has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the ticks, if this is a tick series.
    #[must_use]
    pub fn into_ticks(self) -> Option<Vec<TradeTick>> {
        match self {
            Self::Ticks(ticks) => Some(ticks),
            Self::Bars(_) => None,
        }
    }

    /// Returns the bars, if this is a bar series.
    #[must_use]
    pub fn into_bars(self) -> Option<Vec<OhlcvBar>> {
        match self {
            Self::Bars(bars) => Some(bars),
            Self::Ticks(_) => None,
        }
    }

    /// Returns true if this series holds bars.
    #[must_use]
    pub const fn is_bars(&self) -> bool {
        matches!(self, Self::Bars(_))
    }
}

impl Default for Series {
    fn default() -> Self {
        Self::Ticks(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_matches_interval() {
        assert_eq!(Series::empty(None), Series::Ticks(Vec::new()));
        assert!(Series::empty(Some(Interval::MINUTE)).is_bars());
        assert!(Series::empty(Some(Interval::MINUTE)).is_empty());
    }

    #[test]
    fn test_into_variants() {
        assert_eq!(Series::default().into_ticks(), Some(Vec::new()));
        assert_eq!(Series::default().into_bars(), None);
        assert_eq!(Series::Bars(Vec::new()).into_bars(), Some(Vec::new()));
    }
}
