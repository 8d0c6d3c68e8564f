//! Keychain-backed token store
//!
//! Stores the bearer credential as a single keychain secret identified by a
//! service/account pair. Keychain calls are blocking, so they run on the
//! blocking thread pool.

use async_trait::async_trait;
use authbridge_domain::{AuthBridgeError, Result};
use keyring::Entry;
use tracing::debug;

use super::traits::TokenStore;
use crate::errors::InfraError;

/// Token store persisting the credential in the platform keychain.
#[derive(Debug, Clone)]
pub struct KeychainTokenStore {
    service: String,
    account: String,
}

impl KeychainTokenStore {
    /// Store addressing the secret `service`/`account`.
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self { service: service.into(), account: account.into() }
    }

    async fn with_entry<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> std::result::Result<T, keyring::Error> + Send + 'static,
    {
        let service = self.service.clone();
        let account = self.account.clone();

        tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, &account)?;
            op(entry)
        })
        .await
        .map_err(|e| AuthBridgeError::Internal(format!("keychain task failed: {e}")))?
        .map_err(|e| InfraError::from(e).into())
    }
}

#[async_trait]
impl TokenStore for KeychainTokenStore {
    async fn get(&self) -> Result<Option<String>> {
        debug!(service = %self.service, account = %self.account, "reading token from keychain");

        self.with_entry(|entry| match entry.get_password() {
            Ok(token) if token.is_empty() => Ok(None),
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err),
        })
        .await
    }

    async fn set(&self, token: Option<String>) -> Result<()> {
        match token.filter(|t| !t.is_empty()) {
            Some(token) => {
                debug!(service = %self.service, account = %self.account, "storing token");
                self.with_entry(move |entry| entry.set_password(&token)).await
            }
            None => {
                debug!(service = %self.service, account = %self.account, "deleting token");
                self.with_entry(|entry| match entry.delete_credential() {
                    Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                    Err(err) => Err(err),
                })
                .await
            }
        }
    }
}
