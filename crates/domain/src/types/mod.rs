//! Domain types and models
//!
//! - [`problem`]: RFC 7807 problem documents
//! - [`result`]: the unified success/failure result of a request
//! - [`request`]: request descriptors, methods and credential modes
//! - [`auth`]: payloads of the auth endpoints

pub mod auth;
pub mod problem;
pub mod request;
pub mod result;

pub use auth::{LoginRequest, LoginResponse, MeResponse, RegisterRequest};
pub use problem::ProblemDetails;
pub use request::{ApiRequest, CredentialsMode, HttpMethod};
pub use result::{ApiFailure, ApiResult, CompatError};
