//! Local JSON-file backend used in development.
//!
//! One file per store key at `<data_dir>/<key>.json`, pretty-printed so the
//! files stay hand-editable during development.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::StoreError;

pub struct FileBackend {
    data_dir: PathBuf,
}

impl FileBackend {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    /// Reads the JSON document for `key`.
    ///
    /// A missing file or malformed JSON both yield `None`; only genuine I/O
    /// failures (permissions, disk errors) propagate.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file exists but cannot be read.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.key_path(key);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, path = %path.display(), error = %e,
                    "data file contains malformed JSON, treating as absent");
                Ok(None)
            }
        }
    }

    /// Writes the JSON document for `key`, creating the data directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory or file cannot be
    /// written, or [`StoreError::Serde`] if the value fails to serialize.
    pub async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let path = self.key_path(key);
        if let Some(parent) = path.parent() {
            ensure_dir(parent).await?;
        }

        let raw = serde_json::to_string_pretty(value)?;
        tokio::fs::write(&path, raw)
            .await
            .map_err(|e| StoreError::Io {
                path: path.display().to_string(),
                source: e,
            })
    }

    /// Whether a document for `key` exists on disk. Test helper.
    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        self.key_path(key).exists()
    }
}

async fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| StoreError::Io {
            path: path.display().to_string(),
            source: e,
        })
}
