//! Trade tick representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggressor side of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buyer-initiated trade (+1).
    Buy,
    /// Seller-initiated trade (-1).
    Sell,
}

impl Side {
    /// Maps the exchange's side text onto a side.
    ///
    /// Only the literal `BUY` is a buy; every other value, including
    /// unexpected ones, is a sell. Use [`Side::is_recognized`] to detect
    /// values that were collapsed this way.
    #[must_use]
    pub fn from_exchange(raw: &str) -> Self {
        if raw == "BUY" { Self::Buy } else { Self::Sell }
    }

    /// Returns true if the raw side text is literally `BUY` or `SELL`.
    #[must_use]
    pub fn is_recognized(raw: &str) -> bool {
        matches!(raw, "BUY" | "SELL")
    }

    /// Returns +1 for buys and -1 for sells.
    #[must_use]
    pub const fn sign(&self) -> i8 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
        }
    }

    /// Returns the side as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeTick {
    /// Execution time (UTC).
    pub timestamp: DateTime<Utc>,
    /// Market symbol (e.g., "BTC", "ETH_JPY").
    pub market: String,
    /// Execution price.
    pub price: f64,
    /// Executed quantity.
    pub size: f64,
    /// Aggressor side.
    pub side: Side,
}

impl TradeTick {
    /// Creates a new trade tick.
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        market: impl Into<String>,
        price: f64,
        size: f64,
        side: Side,
    ) -> Self {
        Self {
            timestamp,
            market: market.into(),
            price,
            size,
            side,
        }
    }
}
