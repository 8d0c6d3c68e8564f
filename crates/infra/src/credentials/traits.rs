//! Trait for credential storage
//!
//! This trait enables dependency injection and testing by abstracting the
//! place the bearer token is kept.

use async_trait::async_trait;
use authbridge_domain::Result;

/// Get/set/clear access to the current bearer credential.
///
/// The token is opaque: implementations never inspect it.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Current token, `None` when no session is active.
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be read. A missing token
    /// is `Ok(None)`, not an error.
    async fn get(&self) -> Result<Option<String>>;

    /// Replace the current token. `None` or an empty string removes it.
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be written.
    async fn set(&self, token: Option<String>) -> Result<()>;

    /// Remove the current token. Clearing an empty store succeeds.
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be written.
    async fn clear(&self) -> Result<()> {
        self.set(None).await
    }
}
