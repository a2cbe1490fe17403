//! Court scheduling.
//!
//! [`ResourceScheduler`] binds contests to interchangeable courts and time
//! slots, earliest slot first, under the hard limits in
//! [`SchedulingConstraints`]. Anything that cannot be placed is reported as a
//! conflict rather than failing the whole batch, and a running schedule can be
//! repaired with [`ResourceScheduler::report_delay`].
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use club_fixtures::fixtures::{Participant, RotationEngine};
//! use club_fixtures::scheduling::{Resource, ResourceScheduler, SchedulingConstraints};
//!
//! let players: Vec<Participant> = ["a", "b", "c", "d"]
//!     .iter()
//!     .map(|id| Participant::new(*id, *id, format!("club-{id}")))
//!     .collect();
//! let fixtures = RotationEngine::new().generate_round_robin(&players).unwrap();
//! let contests: Vec<_> = fixtures.contests().cloned().collect();
//!
//! let courts = vec![Resource::new("court-1", "Court 1"), Resource::new("court-2", "Court 2")];
//! let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
//!
//! let mut scheduler = ResourceScheduler::new(SchedulingConstraints::default());
//! let schedule = scheduler.schedule(&contests, &courts, start).unwrap();
//! assert!(schedule.is_fully_placed());
//! assert!(schedule.audit().is_empty());
//! ```

pub mod config;
pub mod errors;
pub mod models;
pub mod scheduler;

pub use config::SchedulingConstraints;
pub use errors::{SchedulingError, SchedulingResult};
pub use models::{
    ConflictReason, Resource, ResourceAvailability, ResourceId, Schedule, ScheduleStats,
    ScheduledContest, SchedulingConflict, SchedulingViolation, ViolationKind,
};
pub use scheduler::ResourceScheduler;
