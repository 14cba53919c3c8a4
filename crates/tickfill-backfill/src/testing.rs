//! In-memory archive source for tests.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tickfill_fetch::ArchiveSource;
use tickfill_types::{ResourceAddress, Side, TradeTick};

/// Archive with a fixed set of published days.
///
/// Directories exist when any published day falls inside them. Days in
/// `failing` exist for probes but fail to load, like a network error.
#[derive(Debug, Default)]
pub(crate) struct FakeArchive {
    market: String,
    days: BTreeMap<NaiveDate, Vec<TradeTick>>,
    failing: BTreeSet<NaiveDate>,
    probes: AtomicUsize,
    loads: AtomicUsize,
}

impl FakeArchive {
    pub(crate) fn new(market: &str) -> Self {
        Self {
            market: market.to_string(),
            ..Default::default()
        }
    }

    /// Publishes a day with one trade per (hour, minute, price, size).
    pub(crate) fn with_day(mut self, date: NaiveDate, trades: &[(u32, u32, f64, f64)]) -> Self {
        let ticks = trades
            .iter()
            .map(|&(hour, minute, price, size)| {
                let ts = Utc
                    .with_ymd_and_hms(date.year(), date.month(), date.day(), hour, minute, 0)
                    .unwrap();
                TradeTick::new(ts, self.market.clone(), price, size, Side::Buy)
            })
            .collect();
        self.days.insert(date, ticks);
        self
    }

    /// Publishes a day whose download always fails.
    pub(crate) fn with_failing_day(mut self, date: NaiveDate) -> Self {
        self.days.insert(date, Vec::new());
        self.failing.insert(date);
        self
    }

    pub(crate) fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub(crate) fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> usize {
        self.probes() + self.loads()
    }
}

#[async_trait]
impl ArchiveSource for FakeArchive {
    async fn probe(&self, address: &ResourceAddress) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if address.market() != self.market {
            return false;
        }
        match *address {
            ResourceAddress::Year { year, .. } => self.days.keys().any(|d| d.year() == year),
            ResourceAddress::Month { year, month, .. } => self
                .days
                .keys()
                .any(|d| d.year() == year && d.month() == month),
            ResourceAddress::Day { .. } => address
                .date()
                .is_some_and(|date| self.days.contains_key(&date)),
        }
    }

    async fn load(&self, address: &ResourceAddress) -> Option<Vec<TradeTick>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if address.market() != self.market {
            return None;
        }
        let date = address.date()?;
        if self.failing.contains(&date) {
            return None;
        }
        self.days.get(&date).cloned()
    }
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
