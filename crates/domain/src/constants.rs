//! Wire-level constants
//!
//! Media types negotiated with the backend and the default location of the
//! auth endpoints.

/// JSON:API media type, used for request bodies and success envelopes.
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

/// RFC 7807 problem document media type.
pub const PROBLEM_MEDIA_TYPE: &str = "application/problem+json";

/// Value of the `Accept` header sent with every request.
pub const ACCEPT_HEADER_VALUE: &str = "application/vnd.api+json, application/problem+json";

/// Attribute of the refresh/login resource holding the bearer credential.
pub const ACCESS_TOKEN_ATTRIBUTE: &str = "access_token";

// Endpoint paths, relative to the API prefix
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const REFRESH_PATH: &str = "/auth/refresh";
pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const REGISTER_PATH: &str = "/user/register";
pub const CURRENT_USER_PATH: &str = "/user/me";

// Problem titles synthesised on the client side
pub const HTTP_ERROR_TITLE: &str = "HTTP Error";
pub const NETWORK_ERROR_TITLE: &str = "Network error";
pub const UNAUTHORIZED_TITLE: &str = "Unauthorized";
pub const INVALID_BODY_TITLE: &str = "Invalid response body";
pub const INVALID_REQUEST_TITLE: &str = "Invalid request body";

/// Fallback message for [`crate::CompatError`] when the problem is silent.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";
