//! Request descriptors

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_keyword_conversions;

/// HTTP methods the client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl_keyword_conversions!(HttpMethod {
    Get => "GET",
    Post => "POST",
    Put => "PUT",
    Patch => "PATCH",
    Delete => "DELETE",
});

impl HttpMethod {
    /// Every method except GET sends a JSON:API body.
    pub const fn sends_body(self) -> bool {
        !matches!(self, Self::Get)
    }
}

/// Whether cookies travel with a request.
///
/// Cookie-dependent flows (login, refresh, logout, refresh-capable clients)
/// use `Include`; pure bearer flows use `Omit` so cookies are never exposed to
/// requests that do not need them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialsMode {
    #[default]
    Omit,
    Include,
}

impl_keyword_conversions!(CredentialsMode {
    Omit => "omit",
    Include => "include",
});

impl CredentialsMode {
    pub const fn includes_cookies(self) -> bool {
        matches!(self, Self::Include)
    }
}

/// One request as issued by a caller. Immutable for the duration of a call,
/// including a refresh-and-retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the client's base URL, starting with `/`.
    pub path: String,
    pub body: Option<Value>,
    /// Overrides the client's configured credential mode when set.
    pub credentials: Option<CredentialsMode>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, credentials: None }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Patch, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, mode: CredentialsMode) -> Self {
        self.credentials = Some(mode);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn method_keywords() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!("delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!("TRACE".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn only_get_is_bodyless() {
        assert!(!HttpMethod::Get.sends_body());
        for method in [HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch, HttpMethod::Delete] {
            assert!(method.sends_body(), "{method} should send a body");
        }
    }

    #[test]
    fn builders_fill_descriptor() {
        let request = ApiRequest::post("/api/auth/login", json!({"user_id": "a"}))
            .with_credentials(CredentialsMode::Include);
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/api/auth/login");
        assert_eq!(request.body, Some(json!({"user_id": "a"})));
        assert_eq!(request.credentials, Some(CredentialsMode::Include));

        let request = ApiRequest::get("/api/user/me");
        assert!(request.body.is_none());
        assert!(request.credentials.is_none());
    }

    #[test]
    fn credentials_mode_defaults_to_omit() {
        assert_eq!(CredentialsMode::default(), CredentialsMode::Omit);
        assert!(CredentialsMode::Include.includes_cookies());
        assert!(!CredentialsMode::Omit.includes_cookies());
    }
}
