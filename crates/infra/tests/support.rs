#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use authbridge_infra::api::UnauthorizedHook;
use authbridge_infra::{
    ApiClientFactory, HttpClient, MemoryTokenStore, SessionSettings, TokenStore,
};
use serde_json::{json, Value};
use wiremock::{MockServer, ResponseTemplate};

pub const JSONAPI: &str = "application/vnd.api+json";
pub const PROBLEM: &str = "application/problem+json";
pub const REFRESH_PATH: &str = "/api/auth/refresh";

/// Unauthenticated hook that counts its invocations.
#[derive(Clone, Default)]
pub struct CountingHook {
    calls: Arc<AtomicUsize>,
}

impl CountingHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hook(&self) -> UnauthorizedHook {
        let calls = Arc::clone(&self.calls);
        Arc::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Factory pointed at a mock server, with an in-memory store and a
/// counting hook.
pub struct TestSession {
    pub factory: ApiClientFactory,
    pub store: Arc<MemoryTokenStore>,
    pub hook: CountingHook,
}

impl TestSession {
    pub fn new(server: &MockServer, token: Option<&str>) -> Self {
        Self::with_base_url(&server.uri(), token)
    }

    pub fn with_base_url(base_url: &str, token: Option<&str>) -> Self {
        let store = Arc::new(token.map_or_else(MemoryTokenStore::new, MemoryTokenStore::with_token));
        let hook = CountingHook::new();

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("http client should build");
        let settings = SessionSettings {
            base_url: base_url.to_string(),
            refresh_path: REFRESH_PATH.to_string(),
            token_store: Arc::clone(&store) as Arc<dyn TokenStore>,
            on_unauthorized: Some(hook.hook()),
        };

        Self { factory: ApiClientFactory::new(Arc::new(http), settings), store, hook }
    }

    pub async fn token(&self) -> Option<String> {
        self.store.get().await.expect("memory store never fails")
    }
}

/// `{"data": {"type", "id", "attributes"}}` with the given attributes.
pub fn resource(kind: &str, id: &str, attributes: Value) -> Value {
    json!({"data": {"type": kind, "id": id, "attributes": attributes}})
}

pub fn jsonapi_response(status: u16, body: &Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.to_string(), JSONAPI)
}

pub fn problem_response(status: u16, title: &str, detail: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(
        json!({"type": "about:blank", "title": title, "status": status, "detail": detail})
            .to_string(),
        PROBLEM,
    )
}

/// Refresh response carrying a new access token.
pub fn refresh_response(token: &str) -> ResponseTemplate {
    jsonapi_response(200, &resource("token", "access", json!({"access_token": token})))
}
