//! Integration tests for the auth endpoint bindings
//!
//! Drives register/login/me/logout against a mock backend that behaves like
//! the real one: login sets a refresh cookie and returns a JSON:API token
//! resource, refresh requires that cookie, logout answers 204.

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use authbridge_domain::{LoginRequest, RegisterRequest};
use authbridge_infra::{AuthApi, EndpointPaths, TokenStore};
use serde_json::json;
use support::{jsonapi_response, problem_response, refresh_response, resource, TestSession};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn auth_api(session: &TestSession) -> AuthApi {
    AuthApi::new(session.factory.clone(), EndpointPaths::default())
}

fn login_request() -> LoginRequest {
    LoginRequest { user_id: "alice".into(), password: "pw".into() }
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"user_id": "alice", "password": "pw"})))
        .respond_with(
            jsonapi_response(200, &resource("token", "access", json!({"access_token": token})))
                .insert_header("set-cookie", "refresh_token=rt-1; Path=/; HttpOnly"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_stores_access_token() {
    let server = MockServer::start().await;
    mount_login(&server, "tok123").await;

    let session = TestSession::new(&server, None);
    let result = auth_api(&session).login(&login_request()).await;

    assert!(result.is_ok());
    assert_eq!(result.data().unwrap().access_token, "tok123");
    assert_eq!(session.token().await.as_deref(), Some("tok123"));
}

#[tokio::test]
async fn failed_login_leaves_store_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(problem_response(401, "Unauthorized", "Invalid credentials"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = TestSession::new(&server, Some("old"));
    let result = auth_api(&session).login(&login_request()).await;

    assert!(result.is_fail());
    assert_eq!(result.compat_error().unwrap().message, "Invalid credentials");
    assert_eq!(session.token().await.as_deref(), Some("old"));
    assert_eq!(session.hook.calls(), 0);
}

#[tokio::test]
async fn login_without_token_attribute_is_invalid_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(jsonapi_response(200, &resource("token", "access", json!({}))))
        .mount(&server)
        .await;

    let session = TestSession::new(&server, None);
    let result = auth_api(&session).login(&login_request()).await;

    assert_eq!(result.status(), Some(200));
    assert_eq!(result.problem().unwrap().title, "Invalid response body");
    assert_eq!(session.token().await, None);
}

#[tokio::test]
async fn register_posts_user_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/register"))
        .and(header("content-type", support::JSONAPI))
        .and(body_json(json!({
            "user_id": "alice",
            "user_name": "Alice",
            "user_email": "alice@example.com",
            "user_password": "pw"
        })))
        .respond_with(jsonapi_response(201, &resource("user", "1", json!({"user_id": "alice"}))))
        .expect(1)
        .mount(&server)
        .await;

    let session = TestSession::new(&server, None);
    let request = RegisterRequest {
        user_id: "alice".into(),
        user_name: "Alice".into(),
        user_email: "alice@example.com".into(),
        user_password: "pw".into(),
    };
    let result = auth_api(&session).register(&request).await;

    assert_eq!(result.status(), Some(201));
    assert_eq!(result.data(), Some(&json!({"user_id": "alice"})));
}

#[tokio::test]
async fn me_decodes_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(jsonapi_response(
            200,
            &resource(
                "user",
                "3",
                json!({"user_id": "alice", "user_email": "alice@example.com", "user_name": null}),
            ),
        ))
        .mount(&server)
        .await;

    let session = TestSession::new(&server, Some("tok"));
    let me = auth_api(&session).me().await.into_result().unwrap();

    assert_eq!(me.user_id, "alice");
    assert_eq!(me.user_email, "alice@example.com");
    assert_eq!(me.user_name, None);
}

#[tokio::test]
async fn me_after_expiry_refreshes_with_login_cookie() {
    let server = MockServer::start().await;
    mount_login(&server, "stale").await;
    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(header("cookie", "refresh_token=rt-1"))
        .respond_with(refresh_response("fresh"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(jsonapi_response(
            200,
            &resource("user", "1", json!({"user_id": "alice", "user_email": "a@x.io"})),
        ))
        .mount(&server)
        .await;

    let session = TestSession::new(&server, None);
    let api = auth_api(&session);

    assert!(api.login(&login_request()).await.is_ok());
    let me = api.me().await;

    assert!(me.is_ok(), "unexpected failure: {:?}", me.problem());
    assert_eq!(me.data().unwrap().user_id, "alice");
    assert_eq!(session.token().await.as_deref(), Some("fresh"));
    assert_eq!(session.hook.calls(), 0);
}

#[tokio::test]
async fn me_with_expired_session_calls_hook() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(problem_response(401, "Unauthorized", "Missing refresh token"))
        .mount(&server)
        .await;

    let session = TestSession::new(&server, Some("stale"));
    let result = auth_api(&session).me().await;

    assert_eq!(result.status(), Some(401));
    assert_eq!(session.hook.calls(), 1);
    assert_eq!(session.token().await, None);
}

#[tokio::test]
async fn logout_clears_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let session = TestSession::new(&server, Some("tok"));
    let result = auth_api(&session).logout().await;

    assert!(result.is_ok());
    assert_eq!(result.status(), Some(204));
    assert_eq!(session.token().await, None);
}

#[tokio::test]
async fn logout_clears_store_when_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(problem_response(500, "Internal Server Error", "Logout failed"))
        .mount(&server)
        .await;

    let session = TestSession::new(&server, Some("tok"));
    let result = auth_api(&session).logout().await;

    assert_eq!(result.status(), Some(500));
    assert_eq!(session.token().await, None);
}

#[tokio::test]
async fn logout_clears_store_when_network_fails() {
    let session = TestSession::with_base_url("http://127.0.0.1:9", Some("tok"));
    let result = auth_api(&session).logout().await;

    assert_eq!(result.status(), None);
    assert_eq!(result.problem().unwrap().title, "Network error");
    assert_eq!(session.token().await, None);
}

#[tokio::test]
async fn explicit_refresh_updates_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(refresh_response("rotated"))
        .expect(1)
        .mount(&server)
        .await;

    let session = TestSession::new(&server, Some("old"));
    assert!(auth_api(&session).refresh().await);
    assert_eq!(session.store.get().await.unwrap().as_deref(), Some("rotated"));
}
