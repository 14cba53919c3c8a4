//! Backfill historical crypto trade archives into tick series or OHLCV bars.
//!
//! This is a facade crate that re-exports functionality from the tickfill
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```no_run
//! use tickfill_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let client = ArchiveClient::with_defaults()?;
//!     let source = CachedSource::in_memory(HttpSource::new(client));
//!     let backfiller = Backfiller::new(source, BackfillConfig::default());
//!
//!     let bars = backfiller.fetch_ohlcv("BTC", 3600).await?;
//!     println!("{} hourly bars", bars.len());
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use tickfill_types::*;

#[cfg(feature = "fetch")]
pub use tickfill_fetch::{
    ArchiveClient, ArchiveSource, CacheError, CacheStore, CachedSource, ClientConfig,
    DecompressError, DiskCache, DownloadError, HttpSource, MemoryCache, ParseError, ParsedDay,
    decompress_gzip, parse_trades, url,
};

#[cfg(feature = "aggregate")]
pub use tickfill_aggregate::{OhlcvBar, aggregate};

#[cfg(feature = "backfill")]
pub use tickfill_backfill::{
    Backfill, BackfillConfig, Backfiller, CancelFlag, DayOutcome, Series, first_existing,
    locate_start,
};

#[cfg(feature = "format")]
pub use tickfill_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
};

/// Prelude module for convenient imports.
///
/// ```
/// use tickfill_lib::prelude::*;
/// ```
pub mod prelude {
    pub use tickfill_types::{
        DateCutoff, FetchWindow, Interval, ResourceAddress, Result, Side, TickfillError, TradeTick,
    };

    #[cfg(feature = "fetch")]
    pub use tickfill_fetch::{
        ArchiveClient, ArchiveSource, CachedSource, ClientConfig, DiskCache, HttpSource,
        MemoryCache,
    };

    #[cfg(feature = "aggregate")]
    pub use tickfill_aggregate::{OhlcvBar, aggregate};

    #[cfg(feature = "backfill")]
    pub use tickfill_backfill::{Backfill, BackfillConfig, Backfiller, CancelFlag, Series};

    #[cfg(feature = "format")]
    pub use tickfill_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};
}
