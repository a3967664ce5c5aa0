use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How persistence is routed, fixed once at startup.
///
/// `Managed` models serverless deployments where the file system is
/// read-only: every read and write goes through the blob service, and blob
/// failures are fatal. `Local` prefers the blob service when configured but
/// may fall back to JSON files under `data_dir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Managed,
    Local,
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::Managed => write!(f, "managed"),
            StorageMode::Local => write!(f, "local"),
        }
    }
}

/// Connection settings for the key-value blob service.
#[derive(Clone)]
pub struct BlobConfig {
    pub endpoint: String,
    pub store: String,
    pub token: Option<String>,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for BlobConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobConfig")
            .field("endpoint", &self.endpoint)
            .field("store", &self.store)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub storage_mode: StorageMode,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub blob: Option<BlobConfig>,
    pub admin_password: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_request_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("storage_mode", &self.storage_mode)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("data_dir", &self.data_dir)
            .field("blob", &self.blob)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "telegram_bot_token",
                &self.telegram_bot_token.as_ref().map(|_| "[redacted]"),
            )
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field(
                "telegram_request_timeout_secs",
                &self.telegram_request_timeout_secs,
            )
            .finish()
    }
}
