//! Access token data models.

use super::errors::TokenRejection;
use crate::fixtures::{ContestId, ParticipantId};
use crate::scheduling::ResourceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a token grants access to.
///
/// Field order is part of the digest input and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Sorted ascending
    pub participant_ids: Vec<ParticipantId>,
    pub contest_id: ContestId,
    pub resource_id: Option<ResourceId>,
    /// Unix seconds
    pub issued_at: i64,
    /// Unix seconds
    pub expires_at: i64,
}

/// A freshly issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    /// `<prefix>-<16 hex chars>`
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub claims: TokenClaims,
}

/// Outcome of validating a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum TokenValidation {
    Valid(TokenClaims),
    Invalid(TokenRejection),
}

impl TokenValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenValidation::Valid(_))
    }

    /// Contest the token was issued for, when valid
    pub fn contest_id(&self) -> Option<&str> {
        match self {
            TokenValidation::Valid(claims) => Some(&claims.contest_id),
            TokenValidation::Invalid(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<TokenRejection> {
        match self {
            TokenValidation::Valid(_) => None,
            TokenValidation::Invalid(reason) => Some(*reason),
        }
    }
}

/// Registry counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStatistics {
    /// Issued, unused and not yet swept
    pub active: usize,
    /// Successfully validated
    pub used: usize,
    pub expiry_mins: u32,
}
