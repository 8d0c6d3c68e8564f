//! # AuthBridge Domain
//!
//! Data types shared by every AuthBridge crate.
//!
//! This crate contains:
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Media types and endpoint path constants
//! - The unified request result, problem documents and auth payloads
//!
//! ## Architecture
//! - No dependencies on other AuthBridge crates
//! - No I/O: everything here is a pure value type

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
