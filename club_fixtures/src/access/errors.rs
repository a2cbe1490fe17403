//! Access token error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while issuing tokens or building the service
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessTokenError {
    /// Missing contest, participants or secret, or bad configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AccessTokenError {
    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        self.to_string()
    }
}

/// Why a token was refused.
///
/// A refusal is an ordinary validation outcome, returned inside
/// [`TokenValidation`](super::TokenValidation) rather than as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenRejection {
    /// Not of the form `<prefix>-<16 hex chars>`
    #[error("Malformed token")]
    Malformed,

    /// Never issued, invalidated, or already swept after expiry
    #[error("Unknown token")]
    UnknownToken,

    /// Digest does not match the stored claims
    #[error("Token integrity check failed")]
    IntegrityFailure,

    /// Past its expiry time
    #[error("Token expired")]
    Expired,

    /// Already validated once
    #[error("Token already used")]
    AlreadyUsed,
}

impl TokenRejection {
    /// Get a client-safe message that doesn't reveal which check failed
    ///
    /// Malformed, unknown and tampered tokens all read as invalid so a caller
    /// cannot map out the registry.
    pub fn client_message(&self) -> String {
        match self {
            TokenRejection::Malformed
            | TokenRejection::UnknownToken
            | TokenRejection::IntegrityFailure => "Invalid access token".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for access token operations
pub type AccessTokenResult<T> = Result<T, AccessTokenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_hides_integrity_details() {
        assert_eq!(
            TokenRejection::IntegrityFailure.client_message(),
            TokenRejection::UnknownToken.client_message()
        );
        assert_eq!(TokenRejection::Expired.client_message(), "Token expired");
        assert_eq!(TokenRejection::AlreadyUsed.client_message(), "Token already used");
    }
}
