//! Error handling.
//!
//! This module provides the error types used throughout the crate:
//! - **Initialization** errors (logger setup)
//! - **Configuration** errors (missing credentials)
//! - **Store** errors (connection, liveness, insert, query, update, (de)serialization)
//!
//! All store operations return `Result<_, StoreError>`; nothing is swallowed
//! into an empty result.

mod types;

// Re-export public API
pub use types::{ConfigError, InitializationError, StoreError};
