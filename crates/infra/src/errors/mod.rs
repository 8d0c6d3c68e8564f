//! Infrastructure error plumbing
//!
//! External library errors are converted into [`AuthBridgeError`] here so the
//! domain crate never depends on `reqwest`, `keyring` or the filesystem.
//!
//! [`AuthBridgeError`]: authbridge_domain::AuthBridgeError

pub mod conversions;

pub use conversions::InfraError;
