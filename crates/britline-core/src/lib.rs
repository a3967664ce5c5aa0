use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod gallery;
pub mod order;
pub mod service;
pub mod slug;
pub mod vehicle;

pub use app_config::{AppConfig, BlobConfig, Environment, StorageMode};
pub use config::{load_app_config, load_app_config_from_env};
pub use slug::normalize;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}
