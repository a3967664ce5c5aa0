//! Storage routing between the blob service and local JSON files.
//!
//! The mode is fixed once at startup from configuration. In managed
//! deployments the file system is read-only, so every operation goes through
//! the blob service and a write failure is fatal: falling back to a file
//! there would look successful while losing the data. Locally the blob
//! service is still preferred when configured (to mirror production), with
//! files as the read fallback and as the write target when no blob service
//! is configured.

mod blob;
mod file;

use serde_json::Value;

use britline_core::{AppConfig, StorageMode};

pub use blob::BlobClient;
pub use file::FileBackend;

use crate::StoreError;

pub struct Storage {
    mode: StorageMode,
    blob: Option<BlobClient>,
    file: FileBackend,
}

impl Storage {
    /// Builds the storage facade from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BlobUnconfigured`] when managed mode is
    /// selected without blob settings (config loading already rejects this,
    /// but the constructor enforces it independently), or a client
    /// construction error.
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let blob = config.blob.as_ref().map(BlobClient::new).transpose()?;
        if config.storage_mode == StorageMode::Managed && blob.is_none() {
            return Err(StoreError::BlobUnconfigured);
        }
        Ok(Self {
            mode: config.storage_mode,
            blob,
            file: FileBackend::new(config.data_dir.clone()),
        })
    }

    /// Storage over local JSON files only. Used by tests and by development
    /// setups without a blob service.
    #[must_use]
    pub fn local(data_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            mode: StorageMode::Local,
            blob: None,
            file: FileBackend::new(data_dir),
        }
    }

    #[must_use]
    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Reads the blob stored under `key`, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// In managed mode a blob read failure propagates. In local mode read
    /// failures degrade to the file fallback, and file problems short of an
    /// I/O error degrade to `None`.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self.mode {
            StorageMode::Managed => {
                let blob = self.blob.as_ref().ok_or(StoreError::BlobUnconfigured)?;
                blob.get(key).await
            }
            StorageMode::Local => {
                if let Some(blob) = &self.blob {
                    match blob.get(key).await {
                        Ok(Some(value)) => return Ok(Some(value)),
                        Ok(None) => {}
                        Err(e) => {
                            tracing::warn!(key, error = %e,
                                "blob read failed in local mode, falling back to file");
                        }
                    }
                }
                self.file.get(key).await
            }
        }
    }

    /// Replaces the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Write failures are fatal in every mode. In managed mode the error is
    /// the blob service's; there is never a file fallback. In local mode the
    /// write goes to the blob service when one is configured, otherwise to
    /// the local file.
    pub async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        match self.mode {
            StorageMode::Managed => {
                let blob = self.blob.as_ref().ok_or(StoreError::BlobUnconfigured)?;
                blob.set(key, value).await
            }
            StorageMode::Local => match &self.blob {
                Some(blob) => blob.set(key, value).await,
                None => self.file.set(key, value).await,
            },
        }
    }

    /// Test-only view of the file backend.
    #[must_use]
    pub fn file_backend(&self) -> &FileBackend {
        &self.file
    }
}
