//! OHLCV aggregation for the tickfill trade archive backfiller.
//!
//! This crate provides tick-to-OHLCV (candlestick) aggregation:
//!
//! - [`OhlcvBar`] - OHLCV bar data structure
//! - [`aggregate`] - Buckets ticks into fixed intervals

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod ohlcv;

pub use aggregator::aggregate;
pub use ohlcv::OhlcvBar;
