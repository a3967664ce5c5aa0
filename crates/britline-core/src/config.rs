use crate::app_config::{AppConfig, BlobConfig, Environment, StorageMode};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or the managed storage mode is
/// selected without blob settings.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or inconsistent.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("BRITLINE_ENV", "development"));
    let storage_mode = parse_storage_mode(&or_default("BRITLINE_STORAGE_MODE", "local"))?;

    let bind_addr = parse_addr("BRITLINE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("BRITLINE_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("BRITLINE_DATA_DIR", "./data"));

    let blob = match lookup("BRITLINE_BLOB_ENDPOINT") {
        Ok(endpoint) => Some(BlobConfig {
            endpoint,
            store: or_default("BRITLINE_BLOB_STORE", "britline-jlr-data"),
            token: lookup("BRITLINE_BLOB_TOKEN").ok(),
            request_timeout_secs: parse_u64("BRITLINE_BLOB_REQUEST_TIMEOUT_SECS", "10")?,
        }),
        Err(_) => None,
    };

    // A managed deployment has no writable file system to fall back to, so a
    // missing blob endpoint must stop startup rather than fail at write time.
    if storage_mode == StorageMode::Managed && blob.is_none() {
        return Err(ConfigError::Validation(
            "BRITLINE_STORAGE_MODE=managed requires BRITLINE_BLOB_ENDPOINT".to_string(),
        ));
    }

    let admin_password = lookup("BRITLINE_ADMIN_PASSWORD")
        .ok()
        .filter(|p| !p.is_empty());

    let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN").ok().filter(|t| !t.is_empty());
    let telegram_chat_id = lookup("TELEGRAM_CHAT_ID").ok().filter(|c| !c.is_empty());
    let telegram_request_timeout_secs = parse_u64("BRITLINE_TELEGRAM_REQUEST_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        env,
        storage_mode,
        bind_addr,
        log_level,
        data_dir,
        blob,
        admin_password,
        telegram_bot_token,
        telegram_chat_id,
        telegram_request_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_storage_mode(s: &str) -> Result<StorageMode, ConfigError> {
    match s {
        "managed" => Ok(StorageMode::Managed),
        "local" => Ok(StorageMode::Local),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BRITLINE_STORAGE_MODE".to_string(),
            reason: format!("expected 'managed' or 'local', got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_to_local_development() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.storage_mode, StorageMode::Local);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.blob.is_none());
        assert!(cfg.admin_password.is_none());
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn managed_mode_without_blob_endpoint_is_rejected() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("BRITLINE_STORAGE_MODE", "managed");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::Validation(_))),
            "expected Validation error, got: {result:?}"
        );
    }

    #[test]
    fn managed_mode_with_blob_endpoint_succeeds() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("BRITLINE_STORAGE_MODE", "managed");
        map.insert("BRITLINE_BLOB_ENDPOINT", "https://blobs.example.com");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.storage_mode, StorageMode::Managed);
        let blob = cfg.blob.expect("blob config");
        assert_eq!(blob.endpoint, "https://blobs.example.com");
        assert_eq!(blob.store, "britline-jlr-data");
        assert!(blob.token.is_none());
        assert_eq!(blob.request_timeout_secs, 10);
    }

    #[test]
    fn unknown_storage_mode_is_rejected() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("BRITLINE_STORAGE_MODE", "netlify");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(
                result,
                Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BRITLINE_STORAGE_MODE"
            ),
            "expected InvalidEnvVar(BRITLINE_STORAGE_MODE), got: {result:?}"
        );
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("BRITLINE_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(
                result,
                Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BRITLINE_BIND_ADDR"
            ),
            "expected InvalidEnvVar(BRITLINE_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn empty_admin_password_is_treated_as_unset() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("BRITLINE_ADMIN_PASSWORD", "");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.admin_password.is_none());
    }

    #[test]
    fn telegram_settings_are_optional() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("TELEGRAM_BOT_TOKEN", "123:abc");
        map.insert("TELEGRAM_CHAT_ID", "-100200300");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.telegram_bot_token.as_deref(), Some("123:abc"));
        assert_eq!(cfg.telegram_chat_id.as_deref(), Some("-100200300"));
        assert_eq!(cfg.telegram_request_timeout_secs, 10);
    }

    #[test]
    fn blob_timeout_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("BRITLINE_BLOB_ENDPOINT", "https://blobs.example.com");
        map.insert("BRITLINE_BLOB_REQUEST_TIMEOUT_SECS", "30");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.blob.unwrap().request_timeout_secs, 30);
    }
}
