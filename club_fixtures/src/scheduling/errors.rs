//! Scheduling error types.

use crate::fixtures::ContestId;
use thiserror::Error;

/// Scheduling errors
///
/// Contests that cannot be placed are not errors; they come back as
/// conflicts and violations on the [`Schedule`](super::Schedule).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulingError {
    /// Malformed constraints, resources or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No scheduled contest with this ID
    #[error("Contest not in schedule: {0}")]
    UnknownContest(ContestId),
}

/// Result type for scheduling operations
pub type SchedulingResult<T> = Result<T, SchedulingError>;
