//! # AuthBridge Infrastructure
//!
//! Everything in AuthBridge that performs I/O.
//!
//! This crate contains:
//! - The HTTP transport with a shared cookie jar
//! - Response normalization, JSON:API decoding and the request orchestrator
//! - Credential refresh and the auth endpoint bindings
//! - Token stores (memory, file, platform keychain)
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Value types and errors come from `authbridge-domain`
//! - No panics on the request path: every outcome is an
//!   [`ApiResult`](authbridge_domain::ApiResult)

pub mod api;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiClientBuilder, ApiClientConfig, ApiClientFactory, AuthApi, EndpointPaths,
    SessionSettings, UnauthorizedHook,
};
pub use credentials::{
    token_store_from_config, CookieFile, FileTokenStore, KeychainTokenStore, MemoryTokenStore, TokenStore,
};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
