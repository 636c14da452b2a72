//! Rate-limit bookkeeping kept across invocations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SeekError, StoreError};

/// Unauthenticated search requests allowed per minute.
pub const UNAUTHENTICATED_SEARCH_LIMIT: u32 = 10;
pub const STATE_FILE_NAME: &str = "repo-seek-rate-limit.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitState {
    pub remaining: u32,
    pub limit: u32,
    /// Epoch seconds at which a rate-limit rejection expires.
    pub reset_epoch_seconds: Option<i64>,
}

impl Default for RateLimitState {
    fn default() -> Self {
        Self {
            remaining: UNAUTHENTICATED_SEARCH_LIMIT,
            limit: UNAUTHENTICATED_SEARCH_LIMIT,
            reset_epoch_seconds: None,
        }
    }
}

impl RateLimitState {
    /// Seconds left in the cooldown at `now`, if one is still running.
    pub fn cooldown_remaining(&self, now: i64) -> Option<i64> {
        match self.reset_epoch_seconds {
            Some(reset) if reset > now => Some(reset - now),
            _ => None,
        }
    }
}

/// Persistence for [`RateLimitState`] between runs.
pub trait RateLimitStore {
    fn read(&self) -> Result<Option<RateLimitState>, SeekError>;
    fn write(&mut self, state: &RateLimitState) -> Result<(), SeekError>;
}

/// Stores the state as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileRateLimitStore {
    path: PathBuf,
}

impl FileRateLimitStore {
    /// A store for the state file inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(STATE_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RateLimitStore for FileRateLimitStore {
    fn read(&self) -> Result<Option<RateLimitState>, SeekError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                }
                .into())
            }
        };
        let state = serde_json::from_str(&contents).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })?;
        debug!("Loaded rate limit state from {}", self.path.display());
        Ok(Some(state))
    }

    fn write(&mut self, state: &RateLimitState) -> Result<(), SeekError> {
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let json = serde_json::to_string(state).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_error)?;
        }
        fs::write(&self.path, json).map_err(io_error)?;
        debug!("Saved rate limit state to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the state in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryRateLimitStore {
    state: Option<RateLimitState>,
}

impl MemoryRateLimitStore {
    pub fn with_state(state: RateLimitState) -> Self {
        Self { state: Some(state) }
    }

    pub fn state(&self) -> Option<&RateLimitState> {
        self.state.as_ref()
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    fn read(&self) -> Result<Option<RateLimitState>, SeekError> {
        Ok(self.state)
    }

    fn write(&mut self, state: &RateLimitState) -> Result<(), SeekError> {
        self.state = Some(*state);
        Ok(())
    }
}
