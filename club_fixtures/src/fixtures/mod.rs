//! Fixture generation: grouping, pairing and round-robin rotation.
//!
//! Every engine here is a pure function of its input roster. Engines return
//! ordered [`Contest`] lists that the caller feeds to the
//! [`ResourceScheduler`](crate::scheduling::ResourceScheduler).
//!
//! ## Example
//!
//! ```
//! use club_fixtures::fixtures::{GroupingEngine, Participant, PairingEngine};
//!
//! let players = vec![
//!     Participant::new("1", "Ana", "north"),
//!     Participant::new("2", "Ben", "north"),
//!     Participant::new("3", "Cai", "south"),
//!     Participant::new("4", "Dee", "south"),
//! ];
//!
//! let grouping = GroupingEngine::new().group(&players, 1).unwrap();
//! let round = PairingEngine::new().pair(&grouping.groups[0].members).unwrap();
//! assert_eq!(round.total_penalty, 0);
//! ```

pub mod entities;
pub mod errors;
pub mod grouping;
pub mod pairing;
pub mod rotation;

pub use entities::{
    BYE_NAME, ClubId, Contest, ContestId, ContestStatus, Entrant, Group, Participant,
    ParticipantId, Round, pair_penalty,
};
pub use errors::{FixtureError, FixtureResult};
pub use grouping::{Grouping, GroupingEngine};
pub use pairing::{DEFAULT_MAX_ITERATIONS, PairingEngine, PairingOutcome};
pub use rotation::{RotationEngine, RoundRobin};

use std::collections::HashSet;

/// Reject rosters that list the same participant twice.
pub(crate) fn ensure_unique_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> FixtureResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(FixtureError::InvalidInput(format!(
                "duplicate participant id: {id}"
            )));
        }
    }
    Ok(())
}
