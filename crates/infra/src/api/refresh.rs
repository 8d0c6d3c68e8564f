//! Credential refresh
//!
//! Exchanges the refresh cookie for a new access token. Only ever called by
//! the orchestrator after a 401, and at most once per logical request.

use authbridge_domain::constants::{ACCEPT_HEADER_VALUE, ACCESS_TOKEN_ATTRIBUTE};
use authbridge_domain::CredentialsMode;
use reqwest::header::ACCEPT;
use reqwest::Method;
use tracing::{debug, info, warn};

use super::client::ApiClientConfig;
use super::envelope;
use super::normalizer::ParsedBody;
use crate::http::HttpClient;

/// POST to the refresh endpoint with cookies included and no Authorization.
///
/// Returns `true` when the server accepted the refresh. A new access token
/// found in the response is written to the configured store; a response
/// without one still counts as success (the cookie may be all that changed).
/// A transport error, a non-2xx status or a failed store write yields
/// `false`.
pub async fn attempt_refresh(http: &HttpClient, config: &ApiClientConfig) -> bool {
    let url = config.url_for(&config.refresh_path);
    let builder = http
        .request(Method::POST, &url, CredentialsMode::Include)
        .header(ACCEPT, ACCEPT_HEADER_VALUE);

    let response = match http.send(builder).await {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "refresh request failed");
            return false;
        }
    };

    let status = response.status();
    if !status.is_success() {
        debug!(status = status.as_u16(), "refresh rejected");
        return false;
    }

    let body = response.text().await.unwrap_or_default();
    let token = match ParsedBody::parse(&body) {
        ParsedBody::Json(document) => extract_access_token(&document),
        ParsedBody::Empty | ParsedBody::Unparseable(_) => None,
    };

    let (Some(token), Some(store)) = (token, config.token_store.as_ref()) else {
        info!("refresh accepted");
        return true;
    };

    match store.set(Some(token)).await {
        Ok(()) => {
            info!("refresh accepted, access token updated");
            true
        }
        Err(err) => {
            warn!(error = %err, "failed to store refreshed access token");
            false
        }
    }
}

fn extract_access_token(document: &serde_json::Value) -> Option<String> {
    envelope::single_resource_attributes(document)?
        .get(ACCESS_TOKEN_ATTRIBUTE)?
        .as_str()
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
