//! Configuration management

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::DEFAULT_API_PREFIX;
use crate::errors::{AuthBridgeError, Result};
use crate::impl_keyword_conversions;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme, host and port of the backend (e.g. `http://localhost:8000`).
    pub base_url: String,
    /// Path prefix shared by every endpoint (e.g. `/api`).
    pub api_prefix: String,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

/// Where the bearer credential is kept between calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub store: TokenStoreKind,
    pub token_path: String,
    pub keychain_service: String,
    pub keychain_account: String,
    /// JSON file holding the cookie jar between runs; `None` keeps cookies
    /// in memory only.
    pub cookie_path: Option<String>,
}

/// Backing storage for the credential store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// Process memory only; the token is lost on exit.
    Memory,
    /// A plain file on disk.
    #[default]
    File,
    /// The platform keychain.
    Keychain,
}

impl_keyword_conversions!(TokenStoreKind {
    Memory => "memory",
    File => "file",
    Keychain => "keychain",
});

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store: TokenStoreKind::File,
            token_path: ".authbridge/access_token".to_string(),
            keychain_service: "authbridge".to_string(),
            keychain_account: "access_token".to_string(),
            cookie_path: Some(".authbridge/cookies.json".to_string()),
        }
    }
}

impl ApiConfig {
    /// Join the API prefix with an endpoint path (`/auth/login` →
    /// `/api/auth/login`).
    pub fn endpoint(&self, path: &str) -> String {
        let prefix = self.api_prefix.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{prefix}{path}")
        } else {
            format!("{prefix}/{path}")
        }
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Config {
    /// Check the values a client cannot work without.
    ///
    /// # Errors
    /// Returns `AuthBridgeError::Config` if the base URL is not an absolute
    /// http(s) URL or the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api.base_url).map_err(|e| {
            AuthBridgeError::Config(format!("Invalid base URL '{}': {}", self.api.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AuthBridgeError::Config(format!(
                "Unsupported base URL scheme: {}",
                url.scheme()
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(AuthBridgeError::Config("Timeout must be greater than zero".into()));
        }

        Ok(())
    }
}
