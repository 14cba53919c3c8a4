//! Error types for tickfill.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for tickfill operations.
pub type Result<T> = std::result::Result<T, TickfillError>;

/// Errors returned by backfill operations.
///
/// Network, decoding, and cache failures never surface here; they resolve
/// to missing days instead.
#[derive(Error, Debug)]
pub enum TickfillError {
    /// Invalid configuration, raised before any network activity.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration errors.
///
/// These are the only errors a fetch can fail with; missing days and
/// markets without history are reported as empty results instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Interval of zero seconds.
    #[error("Interval must be a positive number of seconds")]
    ZeroInterval,

    /// Interval that does not evenly divide one hour.
    #[error("Interval of {0} seconds does not evenly divide 3600")]
    IntervalNotDivisor(u32),

    /// Window start is after its end.
    #[error("Invalid fetch window: {start} > {end}")]
    InvalidWindow {
        /// The start date.
        start: NaiveDate,
        /// The exclusive end date.
        end: NaiveDate,
    },
}
