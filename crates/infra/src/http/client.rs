//! Cookie-aware HTTP transport
//!
//! Wraps reqwest so every request is sent exactly once, with or without the
//! session's cookies depending on its [`CredentialsMode`].

use std::sync::Arc;
use std::time::Duration;

use authbridge_domain::{AuthBridgeError, CredentialsMode};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use reqwest_cookie_store::CookieStoreMutex;
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client with a shared cookie store and per-request credential mode.
///
/// Two reqwest clients are kept: one attached to the cookie store for
/// [`CredentialsMode::Include`] requests, and one without any cookie store
/// for [`CredentialsMode::Omit`] requests. Both share the same timeout and
/// user agent. Cloning is cheap and shares the cookies.
#[derive(Clone)]
pub struct HttpClient {
    with_cookies: ReqwestClient,
    without_cookies: ReqwestClient,
    cookies: Arc<CookieStoreMutex>,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    ///
    /// # Errors
    /// Returns `AuthBridgeError::Config` if the TLS backend cannot be
    /// initialised.
    pub fn new() -> Result<Self, AuthBridgeError> {
        Self::builder().build()
    }

    /// Create a request builder bound to the client for `mode`.
    pub fn request<U>(&self, method: Method, url: U, mode: CredentialsMode) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        match mode {
            CredentialsMode::Include => self.with_cookies.request(method, url),
            CredentialsMode::Omit => self.without_cookies.request(method, url),
        }
    }

    /// Execute the provided request builder once.
    ///
    /// # Errors
    /// Returns `AuthBridgeError::Network` when no response was received and
    /// `AuthBridgeError::InvalidInput` when the request could not be built.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, AuthBridgeError> {
        let (client, request) = builder.build_split();
        let request = request.map_err(|err| AuthBridgeError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }

    /// Cookie store shared by every `Include` request made through this
    /// client.
    pub fn cookie_store(&self) -> &Arc<CookieStoreMutex> {
        &self.cookies
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").finish_non_exhaustive()
    }
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    cookies: Option<Arc<CookieStoreMutex>>,
}

impl std::fmt::Debug for HttpClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientBuilder")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("shared_cookies", &self.cookies.is_some())
            .finish()
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), user_agent: None, cookies: None }
    }
}

impl HttpClientBuilder {
    /// Per-request timeout, covering connect through the end of the body.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Value of the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Reuse an existing cookie store (e.g. one loaded from disk with a
    /// refresh cookie in it).
    #[must_use]
    pub fn cookie_store(mut self, cookies: Arc<CookieStoreMutex>) -> Self {
        self.cookies = Some(cookies);
        self
    }

    /// # Errors
    /// Returns `AuthBridgeError::Config` if reqwest rejects the settings.
    pub fn build(self) -> Result<HttpClient, AuthBridgeError> {
        let cookies = self.cookies.clone().unwrap_or_default();

        let with_cookies = self
            .configure()
            .cookie_provider(Arc::clone(&cookies))
            .build()
            .map_err(Self::config_error)?;
        let without_cookies = self.configure().build().map_err(Self::config_error)?;

        Ok(HttpClient { with_cookies, without_cookies, cookies })
    }

    fn configure(&self) -> reqwest::ClientBuilder {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        builder
    }

    fn config_error(err: reqwest::Error) -> AuthBridgeError {
        AuthBridgeError::Config(format!("Failed to build HTTP client: {err}"))
    }
}
