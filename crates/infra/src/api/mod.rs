//! Backend API client
//!
//! - [`normalizer`] and [`envelope`] turn responses into [`ApiResult`](authbridge_domain::ApiResult)s
//! - [`refresh`] exchanges the refresh cookie for a new access token
//! - [`client`] orchestrates a request, including the single retry after refresh
//! - [`factory`] and [`endpoints`] bind the presets and typed auth operations

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod factory;
pub mod media;
pub mod normalizer;
pub mod refresh;

pub use client::{build_headers, ApiClient, ApiClientBuilder, ApiClientConfig, UnauthorizedHook};
pub use endpoints::{AuthApi, EndpointPaths};
pub use factory::{ApiClientFactory, SessionSettings};
pub use normalizer::{normalize, ParsedBody};
pub use refresh::attempt_refresh;
