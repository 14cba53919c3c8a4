//! Core types for the tickfill trade archive backfiller.
//!
//! This crate provides the fundamental data structures used throughout tickfill:
//!
//! - [`TradeTick`] - A single executed trade with timestamp, price, size, and side
//! - [`Side`] - Aggressor side of a trade
//! - [`Interval`] - Validated OHLCV bar length that evenly divides one hour
//! - [`ResourceAddress`] - Location of a year, month, or day archive resource
//! - [`FetchWindow`] - Market, day range, and interval for one backfill run

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod address;
mod error;
mod interval;
mod tick;
mod window;

pub use address::ResourceAddress;
pub use error::{ConfigError, Result, TickfillError};
pub use interval::{Interval, IntervalParseError};
pub use tick::{Side, TradeTick};
pub use window::{DateCutoff, DayIterator, FetchWindow};
