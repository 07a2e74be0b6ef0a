//! Equity cache persistence.
//!
//! The cache is saved as one JSON document holding every entry. A missing
//! store starts an empty cache. A store that cannot be read back cleanly
//! (bad JSON, invalid counts, two entries for one pair) is discarded with a
//! warning and the cache starts empty.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::cache::{EquityCache, EquityResult};
use super::engine::EquityEngine;

/// Current store layout.
const STORE_VERSION: u32 = 1;

/// Error type for cache persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store file could not be read or written.
    #[error("cache store I/O error on {path}: {source}")]
    Io {
        /// Store location.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Store is not valid JSON.
    #[error("malformed cache store: {0}")]
    Json(#[from] serde_json::Error),
    /// Store was written by another format version.
    #[error("unsupported cache store version {0}")]
    Version(u32),
    /// An entry has inconsistent counts or repeats a matchup.
    #[error("invalid cache entry: {0}")]
    InvalidEntry(String),
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    entries: Vec<&'a EquityResult>,
}

#[derive(Deserialize)]
struct StoreFile {
    version: u32,
    entries: Vec<EquityResult>,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Read and check every entry of a store.
///
/// Fails on unreadable JSON, an unknown version, inconsistent counts or two
/// entries for the same pair of hands.
pub fn read_entries<P: AsRef<Path>>(path: P) -> Result<Vec<EquityResult>, StoreError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(io_error(path))?;
    let store: StoreFile = serde_json::from_reader(BufReader::new(file))?;

    if store.version != STORE_VERSION {
        return Err(StoreError::Version(store.version));
    }

    let mut seen = FxHashSet::default();
    for entry in &store.entries {
        if !entry.is_valid() {
            return Err(StoreError::InvalidEntry(format!(
                "bad counts for {} vs {}",
                entry.favored, entry.unfavored
            )));
        }
        if !seen.insert(entry.pair()) {
            return Err(StoreError::InvalidEntry(format!(
                "{} vs {} stored twice",
                entry.favored, entry.unfavored
            )));
        }
    }

    Ok(store.entries)
}

/// Load a cache, starting empty when the store is missing or unusable.
pub fn load_cache<E: EquityEngine, P: AsRef<Path>>(path: P, engine: E) -> EquityCache<E> {
    let path = path.as_ref();
    let mut cache = EquityCache::new(engine);

    if !path.exists() {
        log::info!("no equity cache at {}, starting empty", path.display());
        return cache;
    }

    match read_entries(path) {
        Ok(entries) => {
            for entry in entries {
                if let Err(e) = cache.insert(entry) {
                    log::warn!("dropping cache entry: {e}");
                }
            }
            log::info!("loaded {} cached matchups from {}", cache.len(), path.display());
        }
        Err(e) => log::warn!("discarding equity cache {}: {e}", path.display()),
    }

    cache
}

/// Write every cached entry to `path`.
///
/// The store is written beside the target and renamed over it, so an
/// interrupted save leaves the previous store intact.
pub fn save_cache<E: EquityEngine, P: AsRef<Path>>(
    cache: &EquityCache<E>,
    path: P,
) -> Result<(), StoreError> {
    let path = path.as_ref();
    let mut entries: Vec<&EquityResult> = cache.entries().collect();
    entries.sort_by_key(|e| e.pair().hands());

    let store = StoreFileRef {
        version: STORE_VERSION,
        entries,
    };

    let tmp = path.with_extension("json.tmp");
    {
        let file = File::create(&tmp).map_err(io_error(&tmp))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &store)?;
        writer.flush().map_err(io_error(&tmp))?;
    }
    fs::rename(&tmp, path).map_err(io_error(path))?;

    log::debug!("saved {} cached matchups to {}", cache.len(), path.display());
    Ok(())
}

/// A cache bound to its store, saved when the session ends.
///
/// Call [`CacheSession::finish`] to save and see any error. A session that
/// is dropped without finishing, including during a panic, still saves and
/// logs a failure.
pub struct CacheSession<E: EquityEngine> {
    cache: EquityCache<E>,
    path: PathBuf,
    saved: bool,
}

impl<E: EquityEngine> CacheSession<E> {
    /// Load the store at `path` (or start empty) and open a session on it.
    pub fn open<P: Into<PathBuf>>(path: P, engine: E) -> Self {
        let path = path.into();
        let cache = load_cache(&path, engine);
        Self {
            cache,
            path,
            saved: false,
        }
    }

    /// Store location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save the cache and close the session.
    pub fn finish(mut self) -> Result<(), StoreError> {
        self.saved = true;
        save_cache(&self.cache, &self.path)
    }
}

impl<E: EquityEngine> Deref for CacheSession<E> {
    type Target = EquityCache<E>;

    fn deref(&self) -> &Self::Target {
        &self.cache
    }
}

impl<E: EquityEngine> DerefMut for CacheSession<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cache
    }
}

impl<E: EquityEngine> Drop for CacheSession<E> {
    fn drop(&mut self) {
        if self.saved {
            return;
        }
        if let Err(e) = save_cache(&self.cache, &self.path) {
            log::error!("failed to save equity cache {}: {e}", self.path.display());
        }
    }
}
