//! Auth endpoint bindings
//!
//! Thin typed wrappers over the client presets. Each binding picks the
//! preset the backend expects and converts the decoded data into a DTO; the
//! orchestration itself lives in [`ApiClient`](super::ApiClient).

use authbridge_domain::constants::{CURRENT_USER_PATH, LOGIN_PATH, LOGOUT_PATH, REGISTER_PATH};
use authbridge_domain::{
    ApiConfig, ApiResult, LoginRequest, LoginResponse, MeResponse, RegisterRequest,
};
use serde_json::Value;
use tracing::{info, warn};

use super::factory::ApiClientFactory;
use super::refresh;

/// Absolute paths (prefix included) of the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPaths {
    pub register: String,
    pub login: String,
    pub me: String,
    pub logout: String,
}

impl EndpointPaths {
    /// Endpoint paths under the configured API prefix.
    pub fn from_config(api: &ApiConfig) -> Self {
        Self {
            register: api.endpoint(REGISTER_PATH),
            login: api.endpoint(LOGIN_PATH),
            me: api.endpoint(CURRENT_USER_PATH),
            logout: api.endpoint(LOGOUT_PATH),
        }
    }
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self::from_config(&ApiConfig::default())
    }
}

/// Session-level auth operations.
#[derive(Debug, Clone)]
pub struct AuthApi {
    factory: ApiClientFactory,
    paths: EndpointPaths,
}

impl AuthApi {
    /// Bind the auth endpoints to one session's presets.
    pub fn new(factory: ApiClientFactory, paths: EndpointPaths) -> Self {
        Self { factory, paths }
    }

    /// Presets for calls outside the typed bindings.
    pub fn factory(&self) -> &ApiClientFactory {
        &self.factory
    }

    pub fn paths(&self) -> &EndpointPaths {
        &self.paths
    }

    /// Create an account. The response body is returned undecoded.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<Value> {
        self.factory.cookie().post(&self.paths.register, request).await
    }

    /// Log in and keep the returned access token in the session store.
    ///
    /// The server also sets the refresh cookie on the shared jar.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let result = self
            .factory
            .cookie()
            .post(&self.paths.login, request)
            .await
            .decode::<LoginResponse>();

        if let Some(response) = result.data() {
            match self.factory.token_store().set(Some(response.access_token.clone())).await {
                Ok(()) => info!(user_id = %request.user_id, "logged in"),
                Err(err) => warn!(error = %err, "logged in but failed to store access token"),
            }
        }

        result
    }

    /// Profile of the current user. Refreshes once on an expired token.
    pub async fn me(&self) -> ApiResult<MeResponse> {
        self.factory.authed().get(&self.paths.me).await.decode::<MeResponse>()
    }

    /// End the session server-side, then forget the local token whatever the
    /// outcome.
    pub async fn logout(&self) -> ApiResult<()> {
        let result = self
            .factory
            .cookie()
            .post(&self.paths.logout, &Value::Object(serde_json::Map::new()))
            .await
            .map(|_| ());

        if let Err(err) = self.factory.token_store().clear().await {
            warn!(error = %err, "failed to clear access token on logout");
        }

        result
    }

    /// Run the refresh exchange directly, outside of any 401 handling.
    pub async fn refresh(&self) -> bool {
        let client = self.factory.authed();
        refresh::attempt_refresh(self.factory.http_client(), client.config()).await
    }
}
