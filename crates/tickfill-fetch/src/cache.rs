//! Memoization of probe and load results.
//!
//! Published archives never change, so both hits and misses are cached
//! without expiry: a day recorded as absent is not requested again.

use async_trait::async_trait;
use directories::ProjectDirs;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tickfill_types::{ResourceAddress, TradeTick};
use tracing::debug;

use crate::ArchiveSource;

/// Errors that can occur while setting up or accessing a disk cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to determine the platform cache directory.
    #[error("Failed to determine cache directory")]
    NoCacheDir,

    /// Failed to create a directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a cache entry.
    #[error("Failed to read cache entry '{path}': {source}")]
    ReadFile {
        /// The entry path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a cache entry.
    #[error("Failed to write cache entry '{path}': {source}")]
    WriteFile {
        /// The entry path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to decode a cache entry.
    #[error("Failed to parse cache entry '{path}': {source}")]
    ParseJson {
        /// The entry path.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Failed to encode a cache entry.
    #[error("Failed to serialize cache entry: {0}")]
    SerializeJson(#[from] serde_json::Error),
}

/// Key-value storage for memoized archive results.
///
/// `get_*` returns `None` on a miss. A stored `None` day (no archive) is a
/// valid entry, distinct from a miss.
pub trait CacheStore: Send + Sync {
    /// Returns a memoized probe result.
    fn get_probe(&self, address: &ResourceAddress) -> Option<bool>;

    /// Records a probe result.
    fn put_probe(&self, address: &ResourceAddress, exists: bool);

    /// Returns a memoized load result.
    fn get_ticks(&self, address: &ResourceAddress) -> Option<Option<Vec<TradeTick>>>;

    /// Records a load result.
    fn put_ticks(&self, address: &ResourceAddress, ticks: Option<&[TradeTick]>);
}

/// In-process cache for the lifetime of one run.
#[derive(Debug, Default)]
pub struct MemoryCache {
    probes: Mutex<HashMap<ResourceAddress, bool>>,
    days: Mutex<HashMap<ResourceAddress, Option<Vec<TradeTick>>>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of memoized entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let probes = self.probes.lock().unwrap_or_else(PoisonError::into_inner).len();
        let days = self.days.lock().unwrap_or_else(PoisonError::into_inner).len();
        probes + days
    }

    /// Returns true if nothing has been memoized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get_probe(&self, address: &ResourceAddress) -> Option<bool> {
        self.probes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address)
            .copied()
    }

    fn put_probe(&self, address: &ResourceAddress, exists: bool) {
        self.probes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address.clone(), exists);
    }

    fn get_ticks(&self, address: &ResourceAddress) -> Option<Option<Vec<TradeTick>>> {
        self.days
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address)
            .cloned()
    }

    fn put_ticks(&self, address: &ResourceAddress, ticks: Option<&[TradeTick]>) {
        self.days
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address.clone(), ticks.map(<[TradeTick]>::to_vec));
    }
}

/// Cache persisted as JSON files, shared across runs.
///
/// Entries live in `probe/{key}.json` and `trades/{key}.json` under the
/// base directory. Unreadable or corrupt entries are treated as misses.
#[derive(Debug, Clone)]
pub struct DiskCache {
    base_path: PathBuf,
    probe_path: PathBuf,
    trades_path: PathBuf,
}

impl DiskCache {
    /// Creates a disk cache rooted at `base_path`.
    ///
    /// Creates the necessary subdirectories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn new(base_path: PathBuf) -> Result<Self, CacheError> {
        let probe_path = base_path.join("probe");
        let trades_path = base_path.join("trades");

        for path in [&base_path, &probe_path, &trades_path] {
            fs::create_dir_all(path).map_err(|e| CacheError::CreateDir {
                path: path.clone(),
                source: e,
            })?;
        }

        Ok(Self {
            base_path,
            probe_path,
            trades_path,
        })
    }

    /// Returns the platform cache directory for tickfill.
    ///
    /// - Linux: `~/.cache/tickfill/`
    /// - macOS: `~/Library/Caches/tickfill/`
    /// - Windows: `C:\Users\<User>\AppData\Local\tickfill\cache\`
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn default_path() -> Result<PathBuf, CacheError> {
        ProjectDirs::from("", "", "tickfill")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .ok_or(CacheError::NoCacheDir)
    }

    /// Creates a disk cache at the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined or created.
    pub fn with_default_path() -> Result<Self, CacheError> {
        Self::new(Self::default_path()?)
    }

    /// Returns the base directory.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn entry_path(dir: &Path, address: &ResourceAddress) -> PathBuf {
        dir.join(format!("{}.json", address.cache_key()))
    }

    fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CacheError> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::ReadFile {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| CacheError::ParseJson {
                path: path.to_path_buf(),
                source: e,
            })
    }

    fn write<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_vec(value)?;

        // Write then rename so a crash never leaves a truncated entry
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| CacheError::WriteFile {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, path).map_err(|e| CacheError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn lookup<T: DeserializeOwned>(path: &Path) -> Option<T> {
        match Self::read(path) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "ignoring unreadable cache entry");
                None
            }
        }
    }

    fn store<T: Serialize + ?Sized>(path: &Path, value: &T) {
        if let Err(e) = Self::write(path, value) {
            debug!(error = %e, "failed to persist cache entry");
        }
    }
}

impl CacheStore for DiskCache {
    fn get_probe(&self, address: &ResourceAddress) -> Option<bool> {
        Self::lookup(&Self::entry_path(&self.probe_path, address))
    }

    fn put_probe(&self, address: &ResourceAddress, exists: bool) {
        Self::store(&Self::entry_path(&self.probe_path, address), &exists);
    }

    fn get_ticks(&self, address: &ResourceAddress) -> Option<Option<Vec<TradeTick>>> {
        Self::lookup(&Self::entry_path(&self.trades_path, address))
    }

    fn put_ticks(&self, address: &ResourceAddress, ticks: Option<&[TradeTick]>) {
        Self::store(&Self::entry_path(&self.trades_path, address), &ticks);
    }
}

/// Memoizing decorator over an [`ArchiveSource`].
///
/// A hit never reaches the inner source; a miss is forwarded and the
/// result recorded, whether present or absent.
#[derive(Debug)]
pub struct CachedSource<S, C = MemoryCache> {
    inner: S,
    store: C,
}

impl<S: ArchiveSource> CachedSource<S> {
    /// Wraps `inner` with an in-memory cache.
    #[must_use]
    pub fn in_memory(inner: S) -> Self {
        Self::new(inner, MemoryCache::new())
    }
}

impl<S: ArchiveSource, C: CacheStore> CachedSource<S, C> {
    /// Wraps `inner` with the given cache store.
    #[must_use]
    pub const fn new(inner: S, store: C) -> Self {
        Self { inner, store }
    }

    /// Returns the cache store.
    #[must_use]
    pub const fn store(&self) -> &C {
        &self.store
    }

    /// Returns the wrapped source.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ArchiveSource, C: CacheStore> ArchiveSource for CachedSource<S, C> {
    async fn probe(&self, address: &ResourceAddress) -> bool {
        if let Some(exists) = self.store.get_probe(address) {
            debug!(%address, exists, "probe cache hit");
            return exists;
        }

        let exists = self.inner.probe(address).await;
        self.store.put_probe(address, exists);
        exists
    }

    async fn load(&self, address: &ResourceAddress) -> Option<Vec<TradeTick>> {
        if let Some(ticks) = self.store.get_ticks(address) {
            debug!(%address, present = ticks.is_some(), "archive cache hit");
            return ticks;
        }

        let ticks = self.inner.load(address).await;
        self.store.put_ticks(address, ticks.as_deref());
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use tickfill_types::Side;

    /// Source that counts calls; only 2021-01-02 exists.
    #[derive(Debug, Default)]
    struct CountingSource {
        probes: AtomicUsize,
        loads: AtomicUsize,
    }

    fn existing_day() -> ResourceAddress {
        ResourceAddress::day("BTC", 2021, 1, 2)
    }

    fn sample_ticks() -> Vec<TradeTick> {
        let ts = Utc.with_ymd_and_hms(2021, 1, 2, 10, 0, 0).unwrap();
        vec![TradeTick::new(ts, "BTC", 3_000_000.0, 0.5, Side::Buy)]
    }

    #[async_trait]
    impl ArchiveSource for CountingSource {
        async fn probe(&self, address: &ResourceAddress) -> bool {
            self.probes.fetch_add(1, Ordering::SeqCst);
            *address == existing_day()
        }

        async fn load(&self, address: &ResourceAddress) -> Option<Vec<TradeTick>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            (*address == existing_day()).then(sample_ticks)
        }
    }

    #[tokio::test]
    async fn test_second_load_hits_cache() {
        let source = CachedSource::in_memory(CountingSource::default());

        let first = source.load(&existing_day()).await;
        let second = source.load(&existing_day()).await;

        assert_eq!(first, Some(sample_ticks()));
        assert_eq!(first, second);
        assert_eq!(source.inner().loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_absent_result_is_cached() {
        let source = CachedSource::in_memory(CountingSource::default());
        let missing = ResourceAddress::day("BTC", 2021, 1, 3);

        assert!(source.load(&missing).await.is_none());
        assert!(source.load(&missing).await.is_none());
        assert!(!source.probe(&missing).await);
        assert!(!source.probe(&missing).await);

        assert_eq!(source.inner().loads.load(Ordering::SeqCst), 1);
        assert_eq!(source.inner().probes.load(Ordering::SeqCst), 1);
        assert_eq!(source.store().len(), 2);
    }

    #[tokio::test]
    async fn test_keys_are_exact_addresses() {
        let source = CachedSource::in_memory(CountingSource::default());

        source.probe(&ResourceAddress::year("BTC", 2021)).await;
        source.probe(&ResourceAddress::year("ETH", 2021)).await;
        source.probe(&ResourceAddress::month("BTC", 2021, 1)).await;

        assert_eq!(source.inner().probes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_disk_cache_persists_across_instances() {
        let dir = TempDir::new().unwrap();

        {
            let cache = DiskCache::new(dir.path().to_path_buf()).unwrap();
            let source = CachedSource::new(CountingSource::default(), cache);
            assert_eq!(source.load(&existing_day()).await, Some(sample_ticks()));
            assert!(source.load(&ResourceAddress::day("BTC", 2021, 1, 3)).await.is_none());
            assert!(source.probe(&existing_day()).await);
        }

        let cache = DiskCache::new(dir.path().to_path_buf()).unwrap();
        let source = CachedSource::new(CountingSource::default(), cache);
        assert_eq!(source.load(&existing_day()).await, Some(sample_ticks()));
        assert!(source.load(&ResourceAddress::day("BTC", 2021, 1, 3)).await.is_none());
        assert!(source.probe(&existing_day()).await);

        assert_eq!(source.inner().loads.load(Ordering::SeqCst), 0);
        assert_eq!(source.inner().probes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_disk_cache_corrupt_entry_is_miss() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path().to_path_buf()).unwrap();
        let path = DiskCache::entry_path(&dir.path().join("trades"), &existing_day());
        fs::write(&path, b"{not json").unwrap();

        assert!(cache.get_ticks(&existing_day()).is_none());
    }

    #[test]
    fn test_disk_cache_layout() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path().join("nested")).unwrap();
        cache.put_probe(&ResourceAddress::year("BTC", 2018), true);

        assert!(cache.base_path().join("probe").join("BTC-2018.json").exists());
        assert_eq!(cache.get_probe(&ResourceAddress::year("BTC", 2018)), Some(true));
    }

    #[test]
    fn test_disk_cache_keeps_markets_apart() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path().to_path_buf()).unwrap();
        let dotted = ResourceAddress::day("BTC.JPY", 2021, 1, 2);
        let slashed = ResourceAddress::day("BTC/JPY", 2021, 1, 2);

        cache.put_ticks(&dotted, Some(&sample_ticks()));

        assert_eq!(cache.get_ticks(&dotted), Some(Some(sample_ticks())));
        assert_eq!(cache.get_ticks(&slashed), None);
    }
}
