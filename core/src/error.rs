//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use crate::registry::HttpMethod;
use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// An entity type or bundle the caller asked for does not exist.
    #[from(ignore)]
    #[display("Not Found: {_0}")]
    NotFound(String),

    /// The request is valid but the content model cannot satisfy it
    /// (e.g. a bundle-scoped schema for an entity type without bundles).
    #[from(ignore)]
    #[display("Unsupported: {_0}")]
    Unsupported(String),

    /// No route matches a resource + method combination.
    #[from(ignore)]
    #[display("No route found for resource '{resource}' and method {method}")]
    RouteResolution {
        /// Resource plugin id (e.g. `entity:node`).
        resource: String,
        /// The requested HTTP method.
        method: HttpMethod,
    },

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

impl AppError {
    /// True for errors that describe a missing sub-resource rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_) | AppError::Unsupported(_))
    }
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
