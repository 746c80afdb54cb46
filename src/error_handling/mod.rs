//! Error handling.
//!
//! Each stage of the two invocation paths has its own error type:
//! - **Lookup**: [`ResolutionError`] (DNS, database open, query)
//! - **Update**: [`UpdateError`], wrapping [`FetchError`] and [`ExtractError`]
//! - **Startup**: [`InitializationError`] (logger, HTTP client)
//!
//! None of them is recovered from locally; the binary prints the error once and
//! exits with status 1.

mod types;

// Re-export public API
pub use types::{ExtractError, FetchError, InitializationError, ResolutionError, UpdateError};
