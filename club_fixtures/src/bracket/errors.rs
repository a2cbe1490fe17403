//! Bracket error types.

use super::models::MatchId;
use thiserror::Error;

/// Bracket construction and progression errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketError {
    /// Malformed or out-of-range arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No match with this ID in the bracket
    #[error("Unknown match: {0}")]
    UnknownMatch(MatchId),

    /// The reported winner does not occupy either slot of the match
    #[error("Participant {winner_id} is not playing in match {match_id}")]
    InvalidWinner {
        match_id: MatchId,
        winner_id: String,
    },

    /// The match already has a result
    #[error("Match {0} already has a result")]
    AlreadyDecided(MatchId),
}

/// Result type for bracket operations
pub type BracketResult<T> = Result<T, BracketError>;
