//! Day-by-day backfill orchestration.

use chrono::{Datelike, NaiveDate};
use tickfill_aggregate::{OhlcvBar, aggregate};
use tickfill_fetch::ArchiveSource;
use tickfill_types::{DateCutoff, FetchWindow, Interval, ResourceAddress, Result, TradeTick};
use tracing::{debug, info};

use crate::{CancelFlag, Series, locate_start};

/// First year probed when searching for a market's history.
const DEFAULT_EARLIEST_YEAR: i32 = 2018;

/// Configuration for a [`Backfiller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackfillConfig {
    /// First year probed when locating a market's first archive.
    pub earliest_year: i32,
    /// Calendar that decides "today"; the backfill ends the day before.
    pub cutoff: DateCutoff,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            earliest_year: DEFAULT_EARLIEST_YEAR,
            cutoff: DateCutoff::Utc,
        }
    }
}

/// Result of processing one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    /// The archive loaded with this many ticks.
    Loaded {
        /// Number of ticks in the archive.
        ticks: usize,
    },
    /// The archive was missing, unreachable, or malformed.
    Missing,
}

/// Outcome of a backfill run.
#[derive(Debug, Clone, PartialEq)]
pub struct Backfill {
    /// Market symbol.
    pub market: String,
    /// First day fetched, or `None` if no history was found.
    pub start: Option<NaiveDate>,
    /// Concatenated ticks or bars in chronological order.
    pub series: Series,
    /// Days in the window.
    pub days_requested: usize,
    /// Days whose archive loaded.
    pub days_loaded: usize,
    /// Days that contributed nothing because the archive was unavailable.
    pub days_missing: usize,
    /// True if the run stopped early at a day boundary.
    pub cancelled: bool,
}

impl Backfill {
    fn empty(market: &str, interval: Option<Interval>) -> Self {
        Self {
            market: market.to_string(),
            start: None,
            series: Series::empty(interval),
            days_requested: 0,
            days_loaded: 0,
            days_missing: 0,
            cancelled: false,
        }
    }

    /// Returns the number of days processed before completion or cancellation.
    #[must_use]
    pub const fn days_processed(&self) -> usize {
        self.days_loaded + self.days_missing
    }
}

/// Backfills a market's full archived history into one series.
///
/// All requests go through the injected [`ArchiveSource`] one at a time;
/// wrap it in a [`tickfill_fetch::CachedSource`] to memoize them.
#[derive(Debug)]
pub struct Backfiller<S> {
    source: S,
    config: BackfillConfig,
    cancel: CancelFlag,
}

impl<S: ArchiveSource> Backfiller<S> {
    /// Creates a backfiller over `source`.
    #[must_use]
    pub fn new(source: S, config: BackfillConfig) -> Self {
        Self {
            source,
            config,
            cancel: CancelFlag::new(),
        }
    }

    /// Uses `cancel` to stop runs early.
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the archive source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &BackfillConfig {
        &self.config
    }

    /// Returns the cancellation flag shared with this backfiller.
    #[must_use]
    pub const fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// Fetches a market's history as raw ticks, or as bars if
    /// `interval_seconds` is given.
    ///
    /// A market without published history yields an empty series.
    ///
    /// # Errors
    ///
    /// Returns a configuration error, before any request, if
    /// `interval_seconds` does not evenly divide 3600.
    pub async fn fetch_trades(&self, market: &str, interval_seconds: Option<u32>) -> Result<Series> {
        let interval = Interval::from_optional(interval_seconds)?;
        Ok(self.backfill(market, interval).await.series)
    }

    /// Fetches a market's history as OHLCV bars.
    ///
    /// # Errors
    ///
    /// Returns a configuration error, before any request, if
    /// `interval_seconds` does not evenly divide 3600.
    pub async fn fetch_ohlcv(&self, market: &str, interval_seconds: u32) -> Result<Vec<OhlcvBar>> {
        let interval = Interval::new(interval_seconds)?;
        let series = self.backfill(market, Some(interval)).await.series;
        Ok(series.into_bars().unwrap_or_default())
    }

    /// Finds the first day `market` published an archive.
    pub async fn locate_start(&self, market: &str) -> Option<NaiveDate> {
        self.locate_start_before(market, self.config.cutoff.today()).await
    }

    async fn locate_start_before(&self, market: &str, today: NaiveDate) -> Option<NaiveDate> {
        locate_start(&self.source, market, self.config.earliest_year, today.year()).await
    }

    /// Locates the market's first archive and backfills through yesterday.
    pub async fn backfill(&self, market: &str, interval: Option<Interval>) -> Backfill {
        self.backfill_with(market, interval, |_, _| {}).await
    }

    /// Like [`Backfiller::backfill`], reporting each day to `on_day`.
    pub async fn backfill_with<F>(
        &self,
        market: &str,
        interval: Option<Interval>,
        on_day: F,
    ) -> Backfill
    where
        F: FnMut(NaiveDate, DayOutcome),
    {
        let today = self.config.cutoff.today();

        let Some(start) = self.locate_start_before(market, today).await else {
            debug!(market, "no data found for market");
            return Backfill::empty(market, interval);
        };

        match FetchWindow::new(market, start, today.max(start), interval) {
            Ok(window) => self.run_window_with(&window, on_day).await,
            Err(e) => {
                debug!(market, error = %e, "invalid window");
                Backfill::empty(market, interval)
            }
        }
    }

    /// Backfills an explicit window without discovery.
    pub async fn run_window(&self, window: &FetchWindow) -> Backfill {
        self.run_window_with(window, |_, _| {}).await
    }

    /// Like [`Backfiller::run_window`], reporting each day to `on_day`.
    pub async fn run_window_with<F>(&self, window: &FetchWindow, mut on_day: F) -> Backfill
    where
        F: FnMut(NaiveDate, DayOutcome),
    {
        info!(%window, days = window.total_days(), "starting backfill");

        let mut report = Backfill::empty(&window.market, window.interval);
        report.start = Some(window.start);
        report.days_requested = window.total_days();

        let mut ticks: Vec<TradeTick> = Vec::new();
        let mut bars: Vec<OhlcvBar> = Vec::new();

        for date in window.days() {
            if self.cancel.is_cancelled() {
                info!(market = %window.market, %date, "backfill cancelled");
                report.cancelled = true;
                break;
            }

            let address = ResourceAddress::for_date(window.market.as_str(), date);
            let Some(day) = self.source.load(&address).await else {
                debug!(%address, "no data for day");
                report.days_missing += 1;
                on_day(date, DayOutcome::Missing);
                continue;
            };

            report.days_loaded += 1;
            on_day(date, DayOutcome::Loaded { ticks: day.len() });

            match window.interval {
                Some(interval) => bars.extend(aggregate(&day, interval)),
                None => ticks.extend(day),
            }
        }

        report.series = match window.interval {
            Some(_) => Series::Bars(bars),
            None => Series::Ticks(ticks),
        };

        if report.series.is_empty() {
            debug!(market = %window.market, "no data found for the specified period and market");
        }
        info!(
            market = %window.market,
            records = report.series.len(),
            loaded = report.days_loaded,
            missing = report.days_missing,
            "backfill finished"
        );

        report
    }
}
