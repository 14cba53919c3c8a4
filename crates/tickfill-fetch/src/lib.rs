//! Archive probing, loading, and caching for the tickfill trade archive backfiller.
//!
//! This crate provides the data access pipeline:
//!
//! - [`url::resource_url`] - Constructs archive and directory URLs
//! - [`ArchiveClient`] - Rate-limited HTTP client
//! - [`decompress::decompress_gzip`] - Gzip decompression
//! - [`parse::parse_trades`] - CSV trade parsing and normalization
//! - [`ArchiveSource`] - The probe/load capability used by the backfiller
//! - [`CachedSource`] - Memoizing decorator over any [`ArchiveSource`]

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cache;
mod client;
mod decompress;
mod parse;
mod source;
pub mod url;

pub use cache::{CacheError, CacheStore, CachedSource, DiskCache, MemoryCache};
pub use client::{ArchiveClient, ClientConfig, DownloadError};
pub use decompress::{DecompressError, decompress_gzip};
pub use parse::{ParseError, ParsedDay, parse_trades};
pub use source::{ArchiveSource, HttpSource};
