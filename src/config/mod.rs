//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (paths, vendor endpoint, timeouts)
//! - The immutable runtime [`Config`]
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::Cli;
pub use constants::*;
pub use types::{resolve_license_key, Config, LogFormat};
