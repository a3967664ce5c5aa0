//! Persistence layer: one JSON blob per logical store, read-modify-written
//! whole on every mutation. The [`backend::Storage`] facade routes between
//! the key-value blob service and local JSON files depending on the
//! configured [`britline_core::StorageMode`].
//!
//! There is deliberately no locking or versioning: two concurrent writers to
//! the same key race and the last write wins. The target deployment is
//! low-concurrency admin usage; see DESIGN.md.

use thiserror::Error;

pub mod backend;
pub mod catalog;
pub mod gallery;
pub mod ordered;
pub mod orders;
pub mod vehicles;

pub use backend::{BlobClient, FileBackend, Storage};
pub use ordered::MoveDirection;

/// Blob keys for the five logical stores. Stable identifiers: existing
/// deployments have data persisted under exactly these names.
pub const SERVICES_KEY: &str = "services";
pub const VEHICLES_KEY: &str = "vehicles";
pub const WORKS_KEY: &str = "works";
pub const CAR_PROJECTS_KEY: &str = "car-projects";
pub const ORDERS_KEY: &str = "orders";

#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed entity/record does not exist under any lookup strategy.
    #[error("{0}")]
    NotFound(String),
    /// Malformed or out-of-range index; the message states the valid range.
    #[error("{0}")]
    InvalidInput(String),
    #[error("blob request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected blob status {status} for key '{key}'")]
    UnexpectedStatus { status: u16, key: String },
    #[error("storage io error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("blob backend is not configured")]
    BlobUnconfigured,
}

impl StoreError {
    /// Whether this failure should surface as a 404 at the HTTP boundary.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
