//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, auth mechanism, URI schemes)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{uri_scheme, Config, LogFormat, LogLevel, OutputFormat};
