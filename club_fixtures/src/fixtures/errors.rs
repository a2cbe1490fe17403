//! Fixture generation error types.

use thiserror::Error;

/// Fixture generation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixtureError {
    /// Malformed or out-of-range arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for fixture generation
pub type FixtureResult<T> = Result<T, FixtureError>;
