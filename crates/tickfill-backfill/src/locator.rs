//! Discovery of a market's first published archive.

use chrono::NaiveDate;
use tickfill_fetch::ArchiveSource;
use tickfill_types::ResourceAddress;
use tracing::debug;

/// Returns the first candidate whose resource exists.
///
/// Candidates are probed strictly in order and the scan stops at the first
/// hit, so at most one probe is issued per candidate up to that point.
pub async fn first_existing<S, T, I>(source: &S, candidates: I) -> Option<T>
where
    S: ArchiveSource + ?Sized,
    I: IntoIterator<Item = (T, ResourceAddress)>,
{
    for (candidate, address) in candidates {
        if source.probe(&address).await {
            return Some(candidate);
        }
    }
    None
}

/// Finds the first day `market` published a trade archive.
///
/// Narrows year, then month, then day with forward scans over
/// `earliest_year..=last_year`, months 1-12, and days 1-31. Archives are
/// assumed contiguous from the first published day, so the first hit at
/// each level is final: a year without any existing month, or a month
/// without any existing day, yields `None`.
pub async fn locate_start<S>(
    source: &S,
    market: &str,
    earliest_year: i32,
    last_year: i32,
) -> Option<NaiveDate>
where
    S: ArchiveSource + ?Sized,
{
    let years = (earliest_year..=last_year).map(|y| (y, ResourceAddress::year(market, y)));
    let Some(year) = first_existing(source, years).await else {
        debug!(market, earliest_year, last_year, "no published year found");
        return None;
    };

    let months = (1..=12).map(|m| (m, ResourceAddress::month(market, year, m)));
    let Some(month) = first_existing(source, months).await else {
        debug!(market, year, "no published month found");
        return None;
    };

    // A hit on a day the month does not have is ignored and the scan resumes
    let mut days = 1..=31;
    loop {
        let candidates = days
            .by_ref()
            .map(|d| (d, ResourceAddress::day(market, year, month, d)));
        let Some(day) = first_existing(source, candidates).await else {
            debug!(market, year, month, "no published day found");
            return None;
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            debug!(market, %date, "located first published day");
            return Some(date);
        }
    }
}
