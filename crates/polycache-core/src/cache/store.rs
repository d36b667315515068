use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to parse cache file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Flat directory of JSON files, one per cache key.
///
/// When disabled, `read` always reports a miss without touching the
/// filesystem and `write` discards its input.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
    enabled: bool,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            root: root.into(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Persist `value` under `key`, replacing any existing entry.
    ///
    /// The JSON is written to a temporary sibling and renamed into place,
    /// so readers never observe a half-written file.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }

        fs::create_dir_all(&self.root).map_err(|source| CacheError::Io {
            path: self.root.clone(),
            source,
        })?;

        let contents = serde_json::to_vec(value).map_err(CacheError::Serialize)?;
        let path = self.entry_path(key);
        let tmp_path = self.root.join(format!(".{}.tmp", key));

        fs::write(&tmp_path, contents).map_err(|source| CacheError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(cache_key = key, "Wrote cache entry");
        Ok(())
    }

    /// Load the entry stored under `key`, or `None` if there is none.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        if !self.enabled {
            return Ok(None);
        }

        let path = self.entry_path(key);
        if !path.is_file() {
            return Ok(None);
        }

        debug!(cache_key = key, "Reading cache entry");
        let contents = fs::read(&path).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;
        let value = serde_json::from_slice(&contents)
            .map_err(|source| CacheError::Parse { path, source })?;
        Ok(Some(value))
    }
}
