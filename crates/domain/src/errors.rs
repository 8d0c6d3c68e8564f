//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for AuthBridge
///
/// The request core never surfaces this type; it reports every outcome as an
/// [`crate::ApiResult`]. These errors come from configuration, client
/// construction and credential storage.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AuthBridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthBridgeError {
    /// The message carried by the error, without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Config(message)
            | Self::Network(message)
            | Self::Storage(message)
            | Self::InvalidInput(message)
            | Self::Internal(message) => message,
        }
    }
}

/// Result type alias for AuthBridge operations
pub type Result<T> = std::result::Result<T, AuthBridgeError>;
