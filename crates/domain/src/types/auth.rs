//! Payloads of the auth endpoints

use serde::{Deserialize, Serialize};

/// Body of `POST {prefix}/user/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_password: String,
}

/// Body of `POST {prefix}/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub user_id: String,
    pub password: String,
}

/// Attributes of the token resource returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Attributes of the current-user resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub user_email: String,
}
