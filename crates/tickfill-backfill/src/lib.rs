//! Start discovery and day-by-day backfill for the tickfill trade archive backfiller.
//!
//! - [`locate_start`] - Finds the first day a market published an archive
//! - [`first_existing`] - Forward scan over candidate resources
//! - [`Backfiller`] - Drives the daily loop and assembles the [`Series`]

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod backfiller;
mod cancel;
mod locator;
mod series;

#[cfg(test)]
mod testing;

pub use backfiller::{Backfill, BackfillConfig, Backfiller, DayOutcome};
pub use cancel::CancelFlag;
pub use locator::{first_existing, locate_start};
pub use series::Series;
