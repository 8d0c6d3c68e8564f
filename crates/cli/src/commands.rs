//! Command implementations

use anyhow::Context;
use authbridge_domain::{ApiRequest, ApiResult, HttpMethod, LoginRequest, RegisterRequest};
use authbridge_infra::AuthApi;
use serde::Serialize;
use serde_json::{json, Value};

use crate::app::{Command, Preset};

/// Execute a parsed command and print its result as JSON.
///
/// Returns whether the request succeeded.
pub async fn execute(api: &AuthApi, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Register { user_id, name, email, password } => {
            let request = RegisterRequest {
                user_id,
                user_name: name,
                user_email: email,
                user_password: password,
            };
            print_result(&api.register(&request).await)
        }
        Command::Login { user_id, password } => {
            print_result(&api.login(&LoginRequest { user_id, password }).await)
        }
        Command::Me => print_result(&api.me().await),
        Command::Logout => print_result(&api.logout().await),
        Command::Refresh => {
            let refreshed = api.refresh().await;
            print_json(&json!({ "ok": refreshed }))?;
            Ok(refreshed)
        }
        Command::Request { method, path, body, preset } => {
            let request = build_request(method, path, body.as_deref())?;
            let client = match preset {
                Preset::Bearer => api.factory().bearer(),
                Preset::Authed => api.factory().authed(),
                Preset::Cookie => api.factory().cookie(),
            };
            print_result(&client.execute(&request).await)
        }
    }
}

fn build_request(method: HttpMethod, path: String, body: Option<&str>) -> anyhow::Result<ApiRequest> {
    let request = ApiRequest::new(method, path);
    match body {
        Some(body) => {
            let body: Value = serde_json::from_str(body).context("--body is not valid JSON")?;
            Ok(request.with_body(body))
        }
        None => Ok(request),
    }
}

fn print_result<T: Serialize>(result: &ApiResult<T>) -> anyhow::Result<bool> {
    print_json(result)?;
    Ok(result.is_ok())
}

#[allow(clippy::print_stdout)]
fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render result")?;
    println!("{rendered}");
    Ok(())
}
