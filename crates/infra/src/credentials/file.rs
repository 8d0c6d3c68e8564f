//! File-backed token store
//!
//! The token is the whole file content. A missing file means no session.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use authbridge_domain::{AuthBridgeError, Result};
use tokio::sync::Mutex;
use tracing::debug;

use super::traits::TokenStore;
use crate::errors::InfraError;

/// Token store persisting the credential to a single file.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write sequences from concurrent callers.
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn remove(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "token file removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_error(err)),
        }
    }
}

fn storage_error(err: std::io::Error) -> AuthBridgeError {
    InfraError::from(err).into()
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;

        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_error(err)),
        }
    }

    async fn set(&self, token: Option<String>) -> Result<()> {
        let _guard = self.lock.lock().await;

        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return self.remove().await;
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(storage_error)?;
        }

        tokio::fs::write(&self.path, token.as_bytes()).await.map_err(storage_error)?;
        debug!(path = %self.path.display(), "token file written");
        Ok(())
    }
}
