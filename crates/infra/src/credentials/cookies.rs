//! Cookie jar persistence
//!
//! The refresh cookie is what lets a new process resume a session, so the
//! jar is written as JSON next to the token between runs.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use authbridge_domain::{AuthBridgeError, Result};
use cookie_store::CookieStore;
use reqwest_cookie_store::CookieStoreMutex;
use tracing::debug;

use crate::errors::InfraError;

/// A cookie jar stored as a JSON file.
#[derive(Debug, Clone)]
pub struct CookieFile {
    path: PathBuf,
}

impl CookieFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the jar. A missing file yields an empty jar; expired cookies are
    /// dropped on the way in.
    pub async fn load(&self) -> Result<Arc<CookieStoreMutex>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(Arc::new(CookieStoreMutex::default()));
            }
            Err(err) => return Err(InfraError::from(err).into()),
        };

        let store = cookie_store::serde::json::load(bytes.as_slice())
            .map_err(|err| self.parse_error(err.as_ref()))?;
        debug!(path = %self.path.display(), "cookie jar loaded");
        Ok(Arc::new(CookieStoreMutex::new(store)))
    }

    /// Write the jar, session cookies included.
    pub async fn save(&self, cookies: &CookieStoreMutex) -> Result<()> {
        let bytes = {
            let store = cookies
                .lock()
                .map_err(|_| AuthBridgeError::Internal("cookie jar lock poisoned".into()))?;
            serialize(&store)?
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(InfraError::from)?;
        }
        tokio::fs::write(&self.path, bytes).await.map_err(InfraError::from)?;
        debug!(path = %self.path.display(), "cookie jar written");
        Ok(())
    }

    fn parse_error(&self, err: &(dyn std::error::Error + Send + Sync)) -> AuthBridgeError {
        AuthBridgeError::Storage(format!("cookie file {}: {err}", self.path.display()))
    }
}

fn serialize(store: &CookieStore) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    cookie_store::serde::json::save_incl_expired_and_nonpersistent(store, &mut bytes)
        .map_err(|err| AuthBridgeError::Storage(format!("cookie jar: {err}")))?;
    Ok(bytes)
}
