//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Environment variables, if `AUTHBRIDGE_BASE_URL` is set
//! 2. Otherwise the first config file found by [`find_config_file`]
//!
//! Either way the result is validated before it is returned.
//!
//! ## Environment Variables
//! - `AUTHBRIDGE_BASE_URL`: backend base URL (required)
//! - `AUTHBRIDGE_API_PREFIX`: endpoint prefix, default `/api`
//! - `AUTHBRIDGE_TIMEOUT_SECS`: request timeout in seconds, default 30
//! - `AUTHBRIDGE_USER_AGENT`: User-Agent header
//! - `AUTHBRIDGE_TOKEN_STORE`: `memory`, `file` or `keychain`
//! - `AUTHBRIDGE_TOKEN_PATH`: token file for the `file` store
//! - `AUTHBRIDGE_COOKIE_PATH`: cookie jar file, or `none` to keep cookies
//!   in memory
//!
//! ## File Locations
//! 1. `./authbridge.{json,toml}`, then `./config.{json,toml}`
//! 2. The same names next to the executable

use std::path::{Path, PathBuf};

use authbridge_domain::{ApiConfig, AuthBridgeError, Config, Result, SessionConfig, TokenStoreKind};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["authbridge.json", "authbridge.toml", "config.json", "config.toml"];

/// Load configuration from the environment, falling back to a file.
///
/// # Errors
/// Returns `AuthBridgeError::Config` if neither source yields a valid
/// configuration.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from `AUTHBRIDGE_*` environment variables.
///
/// Only the base URL is required; everything else falls back to the
/// defaults.
///
/// # Errors
/// Returns `AuthBridgeError::Config` if the base URL is missing or a value
/// does not parse.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("AUTHBRIDGE_BASE_URL")?;

    let api_defaults = ApiConfig::default();
    let api_prefix = optional_env_var("AUTHBRIDGE_API_PREFIX").unwrap_or(api_defaults.api_prefix);
    let timeout_secs = optional_env_var("AUTHBRIDGE_TIMEOUT_SECS")
        .map(|s| {
            s.parse::<u64>()
                .map_err(|e| AuthBridgeError::Config(format!("Invalid timeout: {e}")))
        })
        .transpose()?
        .unwrap_or(api_defaults.timeout_secs);
    let user_agent = optional_env_var("AUTHBRIDGE_USER_AGENT");

    let session_defaults = SessionConfig::default();
    let store = optional_env_var("AUTHBRIDGE_TOKEN_STORE")
        .map(|s| s.parse::<TokenStoreKind>().map_err(AuthBridgeError::Config))
        .transpose()?
        .unwrap_or(session_defaults.store);
    let token_path =
        optional_env_var("AUTHBRIDGE_TOKEN_PATH").unwrap_or(session_defaults.token_path);
    let cookie_path = match optional_env_var("AUTHBRIDGE_COOKIE_PATH") {
        Some(value) if value.eq_ignore_ascii_case("none") => None,
        Some(value) => Some(value),
        None => session_defaults.cookie_path.clone(),
    };

    let config = Config {
        api: ApiConfig { base_url, api_prefix, timeout_secs, user_agent },
        session: SessionConfig { store, token_path, cookie_path, ..session_defaults },
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations. The format is chosen
/// by extension (`.json` or `.toml`); missing fields take their defaults.
///
/// # Errors
/// Returns `AuthBridgeError::Config` if the file is missing, unreadable,
/// malformed or fails validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AuthBridgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            AuthBridgeError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AuthBridgeError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AuthBridgeError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AuthBridgeError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(AuthBridgeError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        AuthBridgeError::Config(format!("Missing required environment variable: {key}"))
    })
}

// Unset and blank are treated the same.
fn optional_env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::TempDir;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ENV_KEYS: [&str; 7] = [
        "AUTHBRIDGE_BASE_URL",
        "AUTHBRIDGE_API_PREFIX",
        "AUTHBRIDGE_TIMEOUT_SECS",
        "AUTHBRIDGE_USER_AGENT",
        "AUTHBRIDGE_TOKEN_STORE",
        "AUTHBRIDGE_TOKEN_PATH",
        "AUTHBRIDGE_COOKIE_PATH",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_from_env_minimal() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("AUTHBRIDGE_BASE_URL", "https://api.example.com");

        let config = load_from_env().unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.api_prefix, "/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.session, SessionConfig::default());

        clear_env();
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("AUTHBRIDGE_BASE_URL", "http://127.0.0.1:9000");
        std::env::set_var("AUTHBRIDGE_API_PREFIX", "/v2");
        std::env::set_var("AUTHBRIDGE_TIMEOUT_SECS", "5");
        std::env::set_var("AUTHBRIDGE_USER_AGENT", "authbridge-test");
        std::env::set_var("AUTHBRIDGE_TOKEN_STORE", "Memory");
        std::env::set_var("AUTHBRIDGE_TOKEN_PATH", "/tmp/token");
        std::env::set_var("AUTHBRIDGE_COOKIE_PATH", "/tmp/cookies.json");

        let config = load_from_env().unwrap();
        assert_eq!(config.api.api_prefix, "/v2");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.user_agent.as_deref(), Some("authbridge-test"));
        assert_eq!(config.session.store, TokenStoreKind::Memory);
        assert_eq!(config.session.token_path, "/tmp/token");
        assert_eq!(config.session.cookie_path.as_deref(), Some("/tmp/cookies.json"));

        clear_env();
    }

    #[test]
    fn test_load_from_env_cookie_path_none_disables_persistence() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("AUTHBRIDGE_BASE_URL", "http://localhost:8000");
        std::env::set_var("AUTHBRIDGE_COOKIE_PATH", "None");

        let config = load_from_env().unwrap();
        assert_eq!(config.session.cookie_path, None);

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_base_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, AuthBridgeError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("AUTHBRIDGE_BASE_URL", "http://localhost:8000");

        std::env::set_var("AUTHBRIDGE_TIMEOUT_SECS", "soon");
        assert!(matches!(load_from_env(), Err(AuthBridgeError::Config(_))));
        std::env::remove_var("AUTHBRIDGE_TIMEOUT_SECS");

        std::env::set_var("AUTHBRIDGE_TOKEN_STORE", "cloud");
        assert!(matches!(load_from_env(), Err(AuthBridgeError::Config(_))));
        std::env::remove_var("AUTHBRIDGE_TOKEN_STORE");

        std::env::set_var("AUTHBRIDGE_BASE_URL", "not a url");
        assert!(matches!(load_from_env(), Err(AuthBridgeError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "authbridge.json",
            r#"{"api": {"base_url": "https://example.com", "timeout_secs": 10},
                "session": {"store": "keychain"}}"#,
        );

        let config = load_from_file(Some(path)).unwrap();
        assert_eq!(config.api.base_url, "https://example.com");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.api_prefix, "/api");
        assert_eq!(config.session.store, TokenStoreKind::Keychain);
        assert_eq!(config.session.keychain_service, "authbridge");
    }

    #[test]
    fn test_load_from_file_toml() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "authbridge.toml",
            r#"
[api]
base_url = "http://localhost:9000"
api_prefix = "/backend"

[session]
store = "memory"
"#,
        );

        let config = load_from_file(Some(path)).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.api.endpoint("/user/me"), "/backend/user/me");
        assert_eq!(config.session.store, TokenStoreKind::Memory);
    }

    #[test]
    fn test_load_from_file_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.toml", "[api]\ntimeout_secs = 0\n");

        let err = load_from_file(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Timeout"));
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/authbridge.json")));
        assert!(matches!(result, Err(AuthBridgeError::Config(_))));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.json", r#"{ "api": "#);

        assert!(load_from_file(Some(path)).is_err(), "Should fail with invalid JSON");
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("api: {}", Path::new("authbridge.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_parse_config_empty_toml_uses_defaults() {
        let config = parse_config("", Path::new("authbridge.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
