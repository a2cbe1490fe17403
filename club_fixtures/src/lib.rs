//! # Club Fixtures
//!
//! A fixture generation and scheduling engine for club competitions.
//!
//! This library turns a roster of participants into a club-balanced
//! competition structure, places that structure on courts and time slots under
//! hard constraints, and issues single-use access tokens for each placed
//! contest. Every component is an in-memory library surface; persistence and
//! transport belong to the caller.
//!
//! ## Pipeline
//!
//! The caller sequences the components; none of them calls another:
//!
//! - **Grouping**: split a roster into balanced groups, spreading clubs
//! - **Pairing**: one round of contests with the fewest same-club meetings
//! - **Rotation**: a full circle-method round-robin
//! - **Bracket**: a seeded single-elimination tree with BYEs and advancement
//! - **Scheduling**: earliest-fit court assignment with rest and delay repair
//! - **Access**: single-use, time-limited, contest-bound tokens
//!
//! ## Core Modules
//!
//! - [`fixtures`]: participants, contests, grouping, pairing and rotation
//! - [`bracket`]: knockout brackets
//! - [`scheduling`]: court scheduling
//! - [`access`]: access token registry
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use club_fixtures::{
//!     GroupingEngine, Participant, Resource, ResourceScheduler, RotationEngine,
//!     SchedulingConstraints,
//! };
//!
//! let roster: Vec<Participant> = (1..=6)
//!     .map(|i| Participant::new(format!("p{i}"), format!("Player {i}"), format!("club{}", i % 2)))
//!     .collect();
//!
//! let grouping = GroupingEngine::new().group(&roster, 2).unwrap();
//! let mut contests = Vec::new();
//! for group in &grouping.groups {
//!     let fixtures = RotationEngine::new().generate_round_robin(&group.members).unwrap();
//!     contests.extend(fixtures.contests().cloned());
//! }
//!
//! let courts = vec![Resource::new("court-1", "Court 1")];
//! let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
//! let schedule = ResourceScheduler::new(SchedulingConstraints::default())
//!     .schedule(&contests, &courts, start)
//!     .unwrap();
//! assert_eq!(schedule.scheduled.len(), 6);
//! ```

mod env;

/// Access tokens for scheduled contests.
pub mod access;
pub use access::{AccessTokenService, Clock, ManualClock, SystemClock, TokenValidation};

/// Seeded single-elimination brackets.
pub mod bracket;
pub use bracket::{Advancement, Bracket, BracketEngine};

/// Core entities and the grouping, pairing and rotation engines.
pub mod fixtures;
pub use fixtures::{
    Contest, ContestStatus, Entrant, Group, GroupingEngine, PairingEngine, Participant,
    RotationEngine,
};

/// Court scheduling under hard constraints.
pub mod scheduling;
pub use scheduling::{Resource, ResourceScheduler, Schedule, SchedulingConstraints};
