//! Conversions from external infrastructure errors into domain errors.
//!
//! Only the failures the transport and stores can actually produce are
//! mapped: a request that never got a response, a request that could not be
//! built, and storage I/O.

use authbridge_domain::AuthBridgeError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AuthBridgeError);

impl From<InfraError> for AuthBridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AuthBridgeError> for InfraError {
    fn from(value: AuthBridgeError) -> Self {
        InfraError(value)
    }
}

// HTTP status codes are never turned into errors here: every response,
// whatever its status, is handed to the normalizer.
impl From<reqwest::Error> for InfraError {
    fn from(err: reqwest::Error) -> Self {
        let mapped = if err.is_builder() {
            AuthBridgeError::InvalidInput(format!("invalid HTTP request: {err}"))
        } else if err.is_timeout() {
            AuthBridgeError::Network(format!("request timed out: {err}"))
        } else if err.is_connect() {
            AuthBridgeError::Network(format!("could not connect: {err}"))
        } else {
            AuthBridgeError::Network(err.to_string())
        };
        InfraError(mapped)
    }
}

impl From<keyring::Error> for InfraError {
    fn from(err: keyring::Error) -> Self {
        let mapped = match &err {
            keyring::Error::NoStorageAccess(_) | keyring::Error::PlatformFailure(_) => {
                AuthBridgeError::Storage(format!("keychain unavailable: {err}"))
            }
            _ => AuthBridgeError::Storage(format!("keychain: {err}")),
        };
        InfraError(mapped)
    }
}

impl From<std::io::Error> for InfraError {
    fn from(err: std::io::Error) -> Self {
        InfraError(AuthBridgeError::Storage(format!("{:?}: {err}", err.kind())))
    }
}
