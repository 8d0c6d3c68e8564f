//! In-memory token store
//!
//! Nothing survives the process; used by tests and one-shot sessions.

use async_trait::async_trait;
use authbridge_domain::Result;
use parking_lot::RwLock;

use super::traits::TokenStore;

/// In-memory token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }

    /// Current token, read without going through the async trait.
    pub fn peek(&self) -> Option<String> {
        self.token.read().clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<String>> {
        Ok(self.peek())
    }

    async fn set(&self, token: Option<String>) -> Result<()> {
        *self.token.write() = token.filter(|t| !t.is_empty());
        Ok(())
    }
}
