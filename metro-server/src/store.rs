//! Current subway data, kept in memory and mirrored to disk.
//!
//! The last successfully built [`SubwayData`] is served until a refresh
//! replaces it. It is also written to a JSON file so that a restarted server
//! can serve immediately, before its first refresh completes. Cached data is
//! served regardless of age.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::schedule::SubwayData;

/// Default location of the cache file.
pub const DEFAULT_CACHE_PATH: &str = "db/data.json";

/// Errors from saving the cache file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create cache directory: {0}")]
    CreateDir(#[source] std::io::Error),

    #[error("failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write cache file: {0}")]
    Write(#[source] std::io::Error),

    #[error("system time before unix epoch")]
    Clock,
}

/// On-disk layout of the cache file.
#[derive(Debug, Serialize, Deserialize)]
struct CachedData {
    /// Unix timestamp when the cache was written.
    cached_at_secs: u64,
    /// The cached data.
    data: SubwayData,
}

/// Current value plus the time it was produced.
#[derive(Debug, Clone)]
pub struct Current {
    pub data: Arc<SubwayData>,
    pub cached_at_secs: u64,
}

/// Thread-safe holder for the data being served.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    current: Arc<RwLock<Option<Current>>>,
}

impl SnapshotStore {
    /// Create an empty store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Try to load the cache file into memory.
    ///
    /// A missing, empty or unreadable file leaves the store empty and
    /// returns `false`.
    pub async fn load(&self) -> bool {
        let Some(cached) = read_cache_file(&self.path) else {
            return false;
        };

        debug!(path = %self.path.display(), "loaded cached subway data");

        let mut guard = self.current.write().await;
        *guard = Some(Current {
            data: Arc::new(cached.data),
            cached_at_secs: cached.cached_at_secs,
        });
        true
    }

    /// Replace the current value and write it to disk.
    ///
    /// The in-memory value is replaced even if the write fails, so a full
    /// disk does not stop fresh data from being served.
    pub async fn save(&self, data: SubwayData) -> Result<(), StoreError> {
        let cached_at_secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|_| StoreError::Clock)?
            .as_secs();

        let data = Arc::new(data);
        {
            let mut guard = self.current.write().await;
            *guard = Some(Current {
                data: data.clone(),
                cached_at_secs,
            });
        }

        write_cache_file(&self.path, &data, cached_at_secs)
    }

    /// The data currently being served, if any.
    pub async fn get(&self) -> Option<Arc<SubwayData>> {
        let guard = self.current.read().await;
        guard.as_ref().map(|c| c.data.clone())
    }

    /// The current value with its timestamp, if any.
    pub async fn current(&self) -> Option<Current> {
        let guard = self.current.read().await;
        guard.clone()
    }
}

fn read_cache_file(path: &Path) -> Option<CachedData> {
    let contents = std::fs::read_to_string(path).ok()?;
    if contents.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(&contents) {
        Ok(cached) => Some(cached),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable cache file");
            None
        }
    }
}

fn write_cache_file(path: &Path, data: &SubwayData, cached_at_secs: u64) -> Result<(), StoreError> {
    // Create parent directories if needed
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(StoreError::CreateDir)?;
    }

    #[derive(Serialize)]
    struct CachedDataRef<'a> {
        cached_at_secs: u64,
        data: &'a SubwayData,
    }

    let json = serde_json::to_string(&CachedDataRef {
        cached_at_secs,
        data,
    })?;

    std::fs::write(path, json).map_err(StoreError::Write)
}
