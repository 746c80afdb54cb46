//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger (plain or JSON, stdout or stderr)
//! - HTTP client for `db-update`
//! - `.env` loading for the license key
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::{init_logger_with, LogTarget};

/// Loads environment variables from a `.env` file, if one exists.
///
/// The current directory is tried first, then the directory holding the
/// executable. This lets `LICENSEKEY` live in `.env` without exporting it.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let env_path = exe_dir.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
            }
        }
    }
}
