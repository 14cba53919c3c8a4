//! Fetch command implementation.
//!
//! Locates the market's first archive (unless a start date is given), walks
//! every day up to the end date, and writes the series to a file.

use super::FetchArgs;
use crate::display::{summary, write_series};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tickfill_lib::{DayOutcome, locate_start};
use tickfill_lib::prelude::*;

/// Fetch a market's trade history.
pub(crate) async fn fetch(args: FetchArgs, quiet: bool) -> Result<()> {
    let source = args.source.open()?;
    let config = args.source.backfill_config();

    let cancel = CancelFlag::new();
    spawn_ctrl_c_handler(cancel.clone());

    let backfiller = Backfiller::new(&*source, config).with_cancel_flag(cancel);
    let today = config.cutoff.today();

    let start = match args.start {
        Some(start) => start,
        None => {
            let spinner = spinner(quiet, format!("Locating first archive for {}", args.market));
            let located = locate_start(&*source, &args.market, config.earliest_year, today.year()).await;
            spinner.finish_and_clear();

            let Some(start) = located else {
                if !quiet {
                    println!("No data found for {}", args.market);
                }
                return Ok(());
            };
            start
        }
    };

    let window = fetch_window(&args.market, start, args.end, today, args.interval)?;

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(window.total_days() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days ({percent}%) {msg}")
                .context("Invalid progress template")?
                .progress_chars("=>-"),
        );
        pb.set_message(window.to_string());
        pb
    };

    let report = backfiller
        .run_window_with(&window, |date, outcome| {
            match outcome {
                DayOutcome::Loaded { ticks } => progress.set_message(format!("{date}: {ticks} trades")),
                DayOutcome::Missing => progress.set_message(format!("{date}: no archive")),
            }
            progress.inc(1);
        })
        .await;

    progress.finish_with_message(summary(&report));

    // Determine output path (default to <market>.<format>)
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.{}", args.market, args.format.extension())));

    write_series(&report.series, &output, args.format)?;

    if !quiet {
        if report.cancelled {
            println!(
                "Cancelled after {} of {} days",
                report.days_processed(),
                report.days_requested
            );
        }
        println!("Output written to: {}", output.display());
    }

    Ok(())
}

/// Builds the window to fetch.
///
/// An explicit `end` must not precede `start`. Without one the window runs
/// to `today`, or is empty if the first archive is today's.
fn fetch_window(
    market: &str,
    start: NaiveDate,
    end: Option<NaiveDate>,
    today: NaiveDate,
    interval: Option<Interval>,
) -> Result<FetchWindow> {
    let end = end.unwrap_or_else(|| today.max(start));
    FetchWindow::new(market, start, end, interval)
        .with_context(|| format!("Invalid date range: {start} -> {end}"))
}

/// Sets `cancel` on the first Ctrl-C; the run stops at the next day boundary.
fn spawn_ctrl_c_handler(cancel: CancelFlag) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping after the current day");
            cancel.cancel();
        }
    });
}

fn spinner(quiet: bool, message: String) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
