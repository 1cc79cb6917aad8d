//! Mock metro client for working without API access.
//!
//! Loads a saved API response from a JSON file and serves it as if it were
//! live. The file is re-read on every fetch so it can be edited while the
//! server runs.

use std::path::{Path, PathBuf};

use crate::schedule::FeedSnapshot;

use super::FeedProvider;
use super::convert::convert_response;
use super::error::FeedError;
use super::types::MetroResponse;

/// Mock metro client that serves data from a JSON file.
#[derive(Debug, Clone)]
pub struct MockMetroClient {
    path: PathBuf,
}

impl MockMetroClient {
    /// Create a mock client reading the given file.
    ///
    /// Fails if the file does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, FeedError> {
        let path = path.into();
        if !path.is_file() {
            return Err(FeedError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("mock feed file not found: {}", path.display()),
            )));
        }
        Ok(Self { path })
    }

    /// Path of the file being served.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file as an untouched JSON value.
    pub fn fetch_raw(&self) -> Result<serde_json::Value, FeedError> {
        let json = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&json).map_err(|e| FeedError::Json {
            message: format!("failed to parse {}: {}", self.path.display(), e),
        })
    }

    /// Read and convert the file.
    pub fn load(&self) -> Result<FeedSnapshot, FeedError> {
        let json = std::fs::read_to_string(&self.path)?;
        let response: MetroResponse = serde_json::from_str(&json).map_err(|e| FeedError::Json {
            message: format!("failed to parse {}: {}", self.path.display(), e),
        })?;
        convert_response(&response)
    }
}

impl FeedProvider for MockMetroClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self) -> Result<FeedSnapshot, FeedError> {
        self.load()
    }
}
