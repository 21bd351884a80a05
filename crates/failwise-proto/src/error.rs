//! Error types for Failwise.

use thiserror::Error;

/// Errors that can occur outside of a reported expectation failure.
///
/// An unmet expectation is never an `Error`: it goes through the
/// [`Reporter`](crate::Reporter) sink. These are usage and setup problems.
#[derive(Debug, Error)]
pub enum Error {
    /// No frame on the call stack belongs to a recognized test entry point
    /// of the owner's type.
    #[error("No test entry point of {suite} found in call stack")]
    EntryPointNotFound { suite: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
