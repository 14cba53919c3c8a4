//! CLI command implementations.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use tickfill_lib::prelude::*;

pub(crate) mod fetch;
pub(crate) mod locate;

/// Archive access options shared by every command.
#[derive(Args, Debug)]
pub(crate) struct SourceArgs {
    /// Cache directory. Defaults to the platform cache directory.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Keep probe and download results in memory only
    #[arg(long, conflicts_with = "cache_dir")]
    no_cache: bool,

    /// Delay before every request, in milliseconds (at least 1000)
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1000..))]
    delay_ms: u64,

    /// Calendar deciding "today": utc, local, or a fixed YYYY-MM-DD
    #[arg(long, default_value = "utc")]
    cutoff: DateCutoff,

    /// First year probed when locating a market's history
    #[arg(long, default_value = "2018")]
    earliest_year: i32,
}

impl SourceArgs {
    /// Builds the cached archive source these options describe.
    pub(crate) fn open(&self) -> Result<Box<dyn ArchiveSource>> {
        let config = ClientConfig {
            request_delay: Duration::from_millis(self.delay_ms),
            ..Default::default()
        };
        let client = ArchiveClient::new(config).context("Failed to create HTTP client")?;
        let http = HttpSource::new(client);

        if self.no_cache {
            return Ok(Box::new(CachedSource::in_memory(http)));
        }

        let disk = match &self.cache_dir {
            Some(dir) => DiskCache::new(dir.clone()),
            None => DiskCache::with_default_path(),
        }
        .context("Failed to open cache directory")?;
        tracing::debug!(path = %disk.base_path().display(), "using disk cache");

        Ok(Box::new(CachedSource::new(http, disk)))
    }

    /// Returns the backfill configuration.
    pub(crate) const fn backfill_config(&self) -> BackfillConfig {
        BackfillConfig {
            earliest_year: self.earliest_year,
            cutoff: self.cutoff,
        }
    }
}

/// Arguments of the `fetch` command.
#[derive(Args, Debug)]
pub(crate) struct FetchArgs {
    /// Market symbol (e.g., BTC, ETH, BTC_JPY)
    pub(crate) market: String,

    /// OHLCV bar length dividing one hour: seconds or 30s, 5m, 1h (omit for raw ticks)
    #[arg(short, long)]
    pub(crate) interval: Option<Interval>,

    /// Start date (YYYY-MM-DD). Defaults to the market's first published day.
    #[arg(short, long)]
    pub(crate) start: Option<NaiveDate>,

    /// End date, exclusive (YYYY-MM-DD). Defaults to today.
    #[arg(short, long)]
    pub(crate) end: Option<NaiveDate>,

    /// Output file path. Defaults to <market>.<format>
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Output format: csv, json, or ndjson
    #[arg(short, long, default_value = "csv")]
    pub(crate) format: OutputFormat,

    #[command(flatten)]
    pub(crate) source: SourceArgs,
}
