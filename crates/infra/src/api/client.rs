//! Request orchestration
//!
//! [`ApiClient::execute`] issues a request, normalizes whatever comes back
//! into an [`ApiResult`], and, for cookie-credentialed clients, recovers from
//! an expired access token by refreshing it and retrying the request once.
//!
//! Per call the client moves through:
//!
//! ```text
//! First ──send──▶ 2xx/4xx/5xx ──────────────────────────────▶ result
//!   │              401 + Include ──refresh ok──▶ Retried ──send──▶ result
//!   │                            └─refresh failed──▶ hook, 401 failure
//!   └──no response──▶ network failure
//! ```
//!
//! A request in the `Retried` state is never refreshed again, so a server
//! that keeps answering 401 costs at most three round trips.

use std::sync::Arc;

use authbridge_domain::constants::{
    ACCEPT_HEADER_VALUE, INVALID_REQUEST_TITLE, JSONAPI_MEDIA_TYPE, REFRESH_PATH,
    UNAUTHORIZED_TITLE,
};
use authbridge_domain::{
    ApiConfig, ApiRequest, ApiResult, AuthBridgeError, CredentialsMode, HttpMethod, ProblemDetails,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use super::normalizer::{self, ParsedBody};
use super::{envelope, media, refresh};
use crate::credentials::TokenStore;
use crate::http::HttpClient;

/// Callback invoked when a session cannot be recovered by refreshing.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Configuration for API client
#[derive(Clone)]
pub struct ApiClientConfig {
    /// Base URL for API (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Cookie mode used when a request does not specify one. `Include` also
    /// enables refresh-and-retry on 401.
    pub credentials: CredentialsMode,
    /// Path of the refresh endpoint, relative to `base_url`.
    pub refresh_path: String,
    /// Source of the bearer credential; `None` sends no Authorization header.
    pub token_store: Option<Arc<dyn TokenStore>>,
    /// Called once the refresh after a 401 has failed, after the token store
    /// has been cleared.
    pub on_unauthorized: Option<UnauthorizedHook>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from_api_config(&ApiConfig::default())
    }
}

impl std::fmt::Debug for ApiClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClientConfig")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("refresh_path", &self.refresh_path)
            .field("token_store", &self.token_store.is_some())
            .field("on_unauthorized", &self.on_unauthorized.is_some())
            .finish()
    }
}

impl ApiClientConfig {
    /// Anonymous, cookie-less configuration for the given backend.
    pub fn from_api_config(api: &ApiConfig) -> Self {
        Self {
            base_url: api.normalized_base_url().to_string(),
            credentials: CredentialsMode::Omit,
            refresh_path: api.endpoint(REFRESH_PATH),
            token_store: None,
            on_unauthorized: None,
        }
    }

    /// Absolute URL for a path relative to the base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Which send of a logical request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retried,
}

/// Response fields the orchestrator needs, read exactly once.
#[derive(Debug)]
struct RawResponse {
    status: u16,
    content_type: String,
    body: String,
}

/// Authenticated JSON:API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Arc<HttpClient>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: ApiClientConfig) -> Result<Self, AuthBridgeError> {
        let http_client = HttpClient::new()?;
        Ok(Self::with_http_client(Arc::new(http_client), config))
    }

    /// Create a client sharing an existing HTTP client (and its cookie jar).
    pub fn with_http_client(http_client: Arc<HttpClient>, config: ApiClientConfig) -> Self {
        Self { http_client, config }
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// The transport this client sends through.
    pub fn http_client(&self) -> &Arc<HttpClient> {
        &self.http_client
    }

    /// GET `path` with the client's default credentials mode.
    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.execute(&ApiRequest::get(path)).await
    }

    /// POST `body` as a JSON:API document. A body that does not serialize
    /// becomes a failure without a status.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        self.with_body(HttpMethod::Post, path, body).await
    }

    /// PUT `body`; see [`ApiClient::post`].
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        self.with_body(HttpMethod::Put, path, body).await
    }

    /// PATCH `body`; see [`ApiClient::post`].
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        self.with_body(HttpMethod::Patch, path, body).await
    }

    /// DELETE `path`. The body is an empty JSON object.
    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.execute(&ApiRequest::delete(path)).await
    }

    async fn with_body<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> ApiResult<Value> {
        match serde_json::to_value(body) {
            Ok(body) => self.execute(&ApiRequest::new(method, path).with_body(body)).await,
            Err(err) => ApiResult::failure(
                None,
                ProblemDetails::new(INVALID_REQUEST_TITLE).with_detail(err.to_string()),
            ),
        }
    }

    /// Execute a request, refreshing the credential and retrying once if the
    /// server reports the caller unauthenticated.
    ///
    /// Never fails: transport errors, HTTP errors and an unrecoverable 401
    /// all come back as [`ApiResult::Failure`].
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: &ApiRequest) -> ApiResult<Value> {
        let credentials = request.credentials.unwrap_or(self.config.credentials);
        let mut attempt = Attempt::First;

        loop {
            let response = match self.send_once(request, credentials).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(error = %err, retry = attempt == Attempt::Retried, "request did not reach the server");
                    return ApiResult::network_failure(err.message());
                }
            };

            let needs_refresh = response.status == 401
                && credentials.includes_cookies()
                && attempt == Attempt::First;

            if !needs_refresh {
                debug!(status = response.status, retry = attempt == Attempt::Retried, "request completed");
                return Self::finish(response);
            }

            debug!("access token rejected, attempting refresh");
            if refresh::attempt_refresh(&self.http_client, &self.config).await {
                attempt = Attempt::Retried;
                continue;
            }

            info!("credential refresh failed, session is unauthenticated");
            self.discard_token().await;
            self.notify_unauthorized();
            return Self::unauthorized(&response);
        }
    }

    async fn send_once(
        &self,
        request: &ApiRequest,
        credentials: CredentialsMode,
    ) -> Result<RawResponse, AuthBridgeError> {
        let token = self.current_token().await;
        debug!(has_token = token.is_some(), ?credentials, "building request");
        let headers = build_headers(request.method, token.as_deref());

        let url = self.config.url_for(&request.path);
        let mut builder =
            self.http_client.request(to_reqwest_method(request.method), &url, credentials).headers(headers);

        if request.method.sends_body() {
            let body = request.body.clone().unwrap_or_else(|| Value::Object(Map::new()));
            builder = builder.body(body.to_string());
        }

        let response = self.http_client.send(builder).await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await.unwrap_or_else(|err| {
            debug!(error = %err, "failed to read response body");
            String::new()
        });

        Ok(RawResponse { status, content_type, body })
    }

    async fn current_token(&self) -> Option<String> {
        let store = self.config.token_store.as_ref()?;
        match store.get().await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                warn!(error = %err, "failed to read access token, sending request without it");
                None
            }
        }
    }

    async fn discard_token(&self) {
        let Some(store) = &self.config.token_store else {
            return;
        };
        if let Err(err) = store.clear().await {
            warn!(error = %err, "failed to clear rejected access token");
        }
    }

    fn notify_unauthorized(&self) {
        if let Some(hook) = &self.config.on_unauthorized {
            hook();
        }
    }

    fn finish(response: RawResponse) -> ApiResult<Value> {
        let result = normalizer::normalize(response.status, &response.content_type, &response.body);

        match result {
            ApiResult::Success { status, data, raw } if media::is_jsonapi(&response.content_type) => {
                let data = envelope::decode(&response.content_type, data).unwrap_or(Value::Null);
                ApiResult::Success { status, data, raw }
            }
            other => other,
        }
    }

    fn unauthorized(response: &RawResponse) -> ApiResult<Value> {
        let parsed = ParsedBody::parse(&response.body);
        let problem = media::is_problem(&response.content_type)
            .then(|| normalizer::parse_problem(response.status, &parsed))
            .flatten()
            .unwrap_or_else(|| ProblemDetails::new(UNAUTHORIZED_TITLE).with_status(response.status));

        ApiResult::failure(Some(response.status), problem).with_raw(parsed.raw())
    }
}

/// Headers for one send.
///
/// Accept is always JSON:API plus problem documents; bodies are declared as
/// JSON:API for every method but GET; Authorization is present exactly when a
/// token is.
pub fn build_headers(method: HttpMethod, token: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER_VALUE));

    if method.sends_body() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSONAPI_MEDIA_TYPE));
    }

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Err(_) => warn!("access token contains characters not allowed in a header, omitting it"),
        }
    }

    headers
}

pub(crate) fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    http_client: Option<Arc<HttpClient>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    #[must_use]
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Share an existing HTTP client
    #[must_use]
    pub fn http_client(mut self, http_client: Arc<HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if a new HTTP client has to be created and that fails
    pub fn build(self) -> Result<ApiClient, AuthBridgeError> {
        let config = self.config.unwrap_or_default();

        match self.http_client {
            Some(http_client) => Ok(ApiClient::with_http_client(http_client, config)),
            None => ApiClient::new(config),
        }
    }
}
