#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use contentdoc_core::AppError;
use derive_more::{Display, From};

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// Generation failure reported by the core.
    #[display("{}", _0)]
    App(AppError),

    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// `General(String)` holds a `String`, which does not implement
/// `std::error::Error`, so `source()` cannot be derived.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
