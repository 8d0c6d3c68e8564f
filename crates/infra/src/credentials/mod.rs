//! Bearer credential storage
//!
//! The request core only ever talks to [`TokenStore`]; where the token lives
//! is the concern of the implementation:
//!
//! - [`MemoryTokenStore`]: process memory, used by tests and short-lived
//!   sessions
//! - [`FileTokenStore`]: a single file on disk
//! - [`KeychainTokenStore`]: the platform keychain via `keyring`
//!
//! The refresh cookie is persisted alongside by [`CookieFile`].
//!
//! Stores serialize their own reads and writes; callers never lock around
//! them.

pub mod cookies;
pub mod file;
pub mod keychain;
pub mod memory;
pub mod traits;

use std::sync::Arc;

use authbridge_domain::{SessionConfig, TokenStoreKind};

pub use cookies::CookieFile;
pub use file::FileTokenStore;
pub use keychain::KeychainTokenStore;
pub use memory::MemoryTokenStore;
pub use traits::TokenStore;

/// Build the store selected by the session configuration.
pub fn token_store_from_config(config: &SessionConfig) -> Arc<dyn TokenStore> {
    match config.store {
        TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
        TokenStoreKind::File => Arc::new(FileTokenStore::new(&config.token_path)),
        TokenStoreKind::Keychain => Arc::new(KeychainTokenStore::new(
            config.keychain_service.clone(),
            config.keychain_account.clone(),
        )),
    }
}
