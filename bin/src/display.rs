//! Display utilities and output writing for the tickfill CLI.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tickfill_lib::prelude::*;

/// Write a tick or bar series to a file in the specified format.
pub(crate) fn write_series(series: &Series, output: &Path, format: OutputFormat) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    let writer = BufWriter::new(file);

    match format {
        OutputFormat::Csv => write_with(&CsvFormatter::new(), series, writer),
        OutputFormat::Json => write_with(&JsonFormatter::new(), series, writer),
        OutputFormat::Ndjson => write_with(&JsonFormatter::ndjson(), series, writer),
    }
}

fn write_with<F: Formatter, W: Write + Send>(
    formatter: &F,
    series: &Series,
    writer: W,
) -> Result<()> {
    match series {
        Series::Ticks(ticks) => formatter.write_ticks(ticks, writer)?,
        Series::Bars(bars) => formatter.write_ohlcv(bars, writer)?,
    }
    Ok(())
}

/// One-line summary of a finished run.
pub(crate) fn summary(report: &Backfill) -> String {
    let kind = if report.series.is_bars() { "bars" } else { "trades" };
    let mut line = format!(
        "{} {kind} from {} days ({} missing)",
        report.series.len(),
        report.days_loaded,
        report.days_missing
    );
    if report.cancelled {
        line.push_str(", cancelled");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn report(series: Series) -> Backfill {
        Backfill {
            market: "BTC".to_string(),
            start: None,
            series,
            days_requested: 3,
            days_loaded: 2,
            days_missing: 1,
            cancelled: false,
        }
    }

    #[test]
    fn test_summary() {
        let tick = TradeTick::new(
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            "BTC",
            100.0,
            1.0,
            Side::Buy,
        );
        let mut report = report(Series::Ticks(vec![tick]));
        assert_eq!(summary(&report), "1 trades from 2 days (1 missing)");

        report.series = Series::Bars(Vec::new());
        report.cancelled = true;
        assert_eq!(summary(&report), "0 bars from 2 days (1 missing), cancelled");
    }

    #[test]
    fn test_write_series() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("btc.csv");

        write_series(&Series::Bars(Vec::new()), &path, OutputFormat::Csv).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "timestamp,open,high,low,close,volume,tick_count\n");
    }
}
