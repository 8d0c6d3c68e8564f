//! Client presets
//!
//! One session talks to the backend through three differently-credentialed
//! clients. They share a single [`HttpClient`], so the refresh cookie set by
//! login is the one replayed by `authed()` and by the refresh call.
//!
//! When the session config names a cookie file, the jar is loaded from it on
//! start and written back by [`ApiClientFactory::save_cookies`], so a later
//! process can still refresh.

use std::sync::Arc;
use std::time::Duration;

use authbridge_domain::constants::REFRESH_PATH;
use authbridge_domain::{AuthBridgeError, Config, CredentialsMode};
use tracing::debug;

use super::client::{ApiClient, ApiClientConfig, UnauthorizedHook};
use crate::credentials::{CookieFile, TokenStore};
use crate::http::HttpClient;

/// Values every preset of one session agrees on.
#[derive(Clone)]
pub struct SessionSettings {
    pub base_url: String,
    pub refresh_path: String,
    pub token_store: Arc<dyn TokenStore>,
    pub on_unauthorized: Option<UnauthorizedHook>,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("base_url", &self.base_url)
            .field("refresh_path", &self.refresh_path)
            .field("on_unauthorized", &self.on_unauthorized.is_some())
            .finish_non_exhaustive()
    }
}

/// Hands out preconfigured [`ApiClient`]s for one session.
#[derive(Debug, Clone)]
pub struct ApiClientFactory {
    http: Arc<HttpClient>,
    settings: SessionSettings,
    cookie_file: Option<CookieFile>,
}

impl ApiClientFactory {
    /// Factory over an existing client whose cookies live in memory only.
    pub fn new(http: Arc<HttpClient>, settings: SessionSettings) -> Self {
        Self { http, settings, cookie_file: None }
    }

    /// Build the shared HTTP client and session settings from configuration,
    /// seeding the cookie jar from `session.cookie_path` when it is set.
    ///
    /// # Errors
    /// Returns `AuthBridgeError::Config` if the configuration is invalid or
    /// the HTTP client cannot be built, and `AuthBridgeError::Storage` if the
    /// cookie file exists but cannot be read.
    pub async fn from_config(
        config: &Config,
        token_store: Arc<dyn TokenStore>,
        on_unauthorized: Option<UnauthorizedHook>,
    ) -> Result<Self, AuthBridgeError> {
        config.validate()?;

        let mut builder =
            HttpClient::builder().timeout(Duration::from_secs(config.api.timeout_secs));
        if let Some(agent) = &config.api.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        let cookie_file = config.session.cookie_path.as_deref().map(CookieFile::new);
        if let Some(file) = &cookie_file {
            builder = builder.cookie_store(file.load().await?);
        }

        let settings = SessionSettings {
            base_url: config.api.normalized_base_url().to_string(),
            refresh_path: config.api.endpoint(REFRESH_PATH),
            token_store,
            on_unauthorized,
        };

        Ok(Self { http: Arc::new(builder.build()?), settings, cookie_file })
    }

    /// Write the shared cookie jar to the configured cookie file. Does
    /// nothing when cookies are not persisted.
    ///
    /// # Errors
    /// Returns `AuthBridgeError::Storage` if the file cannot be written.
    pub async fn save_cookies(&self) -> Result<(), AuthBridgeError> {
        let Some(file) = &self.cookie_file else {
            return Ok(());
        };
        file.save(self.http.cookie_store()).await?;
        debug!(path = %file.path().display(), "session cookies saved");
        Ok(())
    }

    /// Authorization header only. A 401 is returned as-is.
    pub fn bearer(&self) -> ApiClient {
        self.client(CredentialsMode::Omit, true)
    }

    /// Authorization header plus cookies. A 401 triggers refresh-and-retry.
    pub fn authed(&self) -> ApiClient {
        self.client(CredentialsMode::Include, true)
    }

    /// Cookies only: no Authorization header and no unauthenticated hook.
    pub fn cookie(&self) -> ApiClient {
        self.client(CredentialsMode::Include, false)
    }

    /// Settings shared by every preset.
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// The session's credential store.
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.settings.token_store
    }

    /// The transport shared by every preset.
    pub fn http_client(&self) -> &Arc<HttpClient> {
        &self.http
    }

    fn client(&self, credentials: CredentialsMode, with_token: bool) -> ApiClient {
        let config = ApiClientConfig {
            base_url: self.settings.base_url.clone(),
            credentials,
            refresh_path: self.settings.refresh_path.clone(),
            token_store: with_token.then(|| Arc::clone(&self.settings.token_store)),
            on_unauthorized: if with_token { self.settings.on_unauthorized.clone() } else { None },
        };
        ApiClient::with_http_client(Arc::clone(&self.http), config)
    }
}
