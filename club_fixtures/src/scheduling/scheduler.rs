//! Earliest-fit court scheduler.
//!
//! ## Algorithm
//!
//! Courts sit in a min-heap keyed by the time they are next free. Contests are
//! taken in input order; for each one the earliest-free court is popped and
//! the candidate start is the latest of the court's free time, each
//! participant's rest floor and the opening hour of that day. A candidate that
//! would run past closing time, or land on a court that has reached its daily
//! cap, is recorded as a violation and the next court is tried, up to every
//! court once. On success the court is pushed back with its free time moved to
//! `end + buffer` and both participants' rest floors are raised to
//! `end + minimum rest`.
//!
//! ## Complexity
//!
//! O(M log C) for M contests and C courts when the first court fits; the retry
//! path is bounded by C pops per contest.

use super::config::SchedulingConstraints;
use super::errors::{SchedulingError, SchedulingResult};
use super::models::{
    ConflictReason, Resource, ResourceAvailability, ResourceId, Schedule, ScheduledContest,
    SchedulingConflict, SchedulingViolation, ViolationKind, at_hour,
};
use crate::fixtures::{Contest, ContestStatus, ParticipantId};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Stateful scheduler for one scheduling session.
///
/// Holds the court heap, the per-participant rest floors and the per-court
/// daily counts. Not internally synchronised: callers sharing one instance
/// across threads must wrap it in a mutex.
#[derive(Debug, Clone)]
pub struct ResourceScheduler {
    constraints: SchedulingConstraints,
    queue: BinaryHeap<Reverse<ResourceAvailability>>,
    /// Earliest permissible next start per participant
    rest_floors: HashMap<ParticipantId, DateTime<Utc>>,
    daily_load: HashMap<(ResourceId, NaiveDate), u32>,
}

impl ResourceScheduler {
    pub fn new(constraints: SchedulingConstraints) -> Self {
        Self {
            constraints,
            queue: BinaryHeap::new(),
            rest_floors: HashMap::new(),
            daily_load: HashMap::new(),
        }
    }

    pub fn constraints(&self) -> &SchedulingConstraints {
        &self.constraints
    }

    /// Earliest time `participant_id` may start another contest
    pub fn rest_floor(&self, participant_id: &str) -> Option<DateTime<Utc>> {
        self.rest_floors.get(participant_id).copied()
    }

    /// Place `contests` on `resources`, starting no earlier than `start_time`.
    ///
    /// Resets any previous session state. BYE contests are never placed; they
    /// come back in [`Schedule::walkovers`]. Contests that fit nowhere come
    /// back in [`Schedule::conflicts`] and every rejected attempt is listed in
    /// [`Schedule::violations`]; the rest of the batch is still placed.
    ///
    /// # Errors
    ///
    /// * `SchedulingError::InvalidInput` - invalid constraints, no resources,
    ///   or a repeated resource ID
    pub fn schedule(
        &mut self,
        contests: &[Contest],
        resources: &[Resource],
        start_time: DateTime<Utc>,
    ) -> SchedulingResult<Schedule> {
        self.constraints.validate()?;
        if resources.is_empty() {
            return Err(SchedulingError::InvalidInput(
                "at least one resource is required".to_string(),
            ));
        }
        let mut ids = HashSet::new();
        if let Some(duplicate) = resources.iter().find(|r| !ids.insert(r.id.as_str())) {
            return Err(SchedulingError::InvalidInput(format!(
                "duplicate resource id: {}",
                duplicate.id
            )));
        }

        self.reset(resources, start_time);

        let mut schedule = Schedule {
            scheduled: Vec::with_capacity(contests.len()),
            walkovers: Vec::new(),
            conflicts: Vec::new(),
            violations: Vec::new(),
            availability: Vec::new(),
            constraints: self.constraints,
        };

        for contest in contests {
            if contest.has_bye() {
                let mut walkover = contest.clone();
                walkover.status = ContestStatus::Walkover;
                schedule.walkovers.push(walkover);
                continue;
            }
            if contest.home.id() == contest.away.id() {
                schedule.conflicts.push(SchedulingConflict {
                    contest: contest.clone(),
                    reason: ConflictReason::SameParticipant,
                });
                continue;
            }

            match self.place(contest, &mut schedule.violations) {
                Ok(placed) => {
                    log::debug!(
                        "Scheduled {} on {} at {}",
                        placed.contest.id,
                        placed.resource_id,
                        placed.start
                    );
                    schedule.scheduled.push(placed);
                }
                Err(attempts) => {
                    log::warn!(
                        "Contest {} could not be placed after {} attempts",
                        contest.id,
                        attempts
                    );
                    schedule.conflicts.push(SchedulingConflict {
                        contest: contest.clone(),
                        reason: ConflictReason::NoFeasibleResource { attempts },
                    });
                }
            }
        }

        schedule.availability = self.availability();
        log::info!(
            "Scheduled {} of {} contests on {} resources ({} walkovers, {} conflicts)",
            schedule.scheduled.len(),
            contests.len(),
            resources.len(),
            schedule.walkovers.len(),
            schedule.conflicts.len()
        );

        Ok(schedule)
    }

    /// Push back a contest that is running late.
    ///
    /// The delayed contest and every contest starting after it on the same
    /// court move back by `delay_mins`; each shifted contest accumulates the
    /// delay in [`ScheduledContest::delay_mins`]. The shifted set is then
    /// re-checked against working hours and rest gaps, and anything that no
    /// longer fits is appended to the violations. Nothing is dropped.
    ///
    /// Court free times, rest floors and daily counts are rebuilt from
    /// `schedule`, so the scheduler continues from the delayed session.
    ///
    /// # Errors
    ///
    /// * `SchedulingError::UnknownContest` - `contest_id` is not scheduled
    /// * `SchedulingError::InvalidInput` - `delay_mins` is zero
    pub fn report_delay(
        &mut self,
        schedule: &Schedule,
        contest_id: &str,
        delay_mins: u32,
    ) -> SchedulingResult<Schedule> {
        if delay_mins == 0 {
            return Err(SchedulingError::InvalidInput(
                "delay must be at least one minute".to_string(),
            ));
        }
        let target = schedule
            .get(contest_id)
            .ok_or_else(|| SchedulingError::UnknownContest(contest_id.to_string()))?;
        let resource_id = target.resource_id.clone();
        let from = target.start;

        let delay = Duration::minutes(i64::from(delay_mins));
        let mut updated = schedule.clone();
        let mut shifted = HashSet::new();
        for contest in updated
            .scheduled
            .iter_mut()
            .filter(|s| {
                s.resource_id == resource_id && (s.contest.id == contest_id || s.start > from)
            })
        {
            contest.start += delay;
            contest.end += delay;
            contest.delay_mins += delay_mins;
            shifted.insert(contest.contest.id.clone());
        }

        let new_violations: Vec<SchedulingViolation> = updated
            .audit()
            .into_iter()
            .filter(|v| {
                shifted.contains(&v.contest_id)
                    || matches!(&v.kind, ViolationKind::InsufficientRest { other_contest_id, .. }
                        if shifted.contains(other_contest_id))
            })
            .filter(|v| !updated.violations.contains(v))
            .collect();

        for violation in &new_violations {
            log::warn!(
                "Delay on {} broke a constraint for {}: {:?}",
                contest_id,
                violation.contest_id,
                violation.kind
            );
        }
        updated.violations.extend(new_violations);

        self.resume_from(&updated);
        updated.availability = self.availability();

        log::info!(
            "Delayed {} by {} minutes, {} contests shifted on {}",
            contest_id,
            delay_mins,
            shifted.len(),
            resource_id
        );

        Ok(updated)
    }

    fn reset(&mut self, resources: &[Resource], start_time: DateTime<Utc>) {
        self.queue = resources
            .iter()
            .enumerate()
            .map(|(resource_index, r)| {
                Reverse(ResourceAvailability {
                    next_free_at: start_time,
                    resource_index,
                    resource_id: r.id.clone(),
                })
            })
            .collect();
        self.rest_floors.clear();
        self.daily_load.clear();
    }

    /// Court availability sorted by court input order
    fn availability(&self) -> Vec<ResourceAvailability> {
        let mut availability: Vec<ResourceAvailability> =
            self.queue.iter().map(|Reverse(a)| a.clone()).collect();
        availability.sort_by_key(|a| a.resource_index);
        availability
    }

    /// Try every court once, earliest first. Returns the attempt count on failure.
    fn place(
        &mut self,
        contest: &Contest,
        violations: &mut Vec<SchedulingViolation>,
    ) -> Result<ScheduledContest, usize> {
        let attempts = self.queue.len();
        let mut rejected = Vec::with_capacity(attempts);
        let mut placed = None;

        while let Some(Reverse(mut court)) = self.queue.pop() {
            let start = self.earliest_start(court.next_free_at, contest);
            let end = start + self.constraints.contest_duration();

            match self.check_slot(&court.resource_id, start, end) {
                Some(kind) => {
                    violations.push(SchedulingViolation {
                        contest_id: contest.id.clone(),
                        resource_id: Some(court.resource_id.clone()),
                        kind,
                    });
                    rejected.push(court);
                }
                None => {
                    self.bind(contest, &court.resource_id, start, end);
                    let mut scheduled = contest.clone();
                    scheduled.status = ContestStatus::Scheduled;
                    placed = Some(ScheduledContest {
                        contest: scheduled,
                        resource_id: court.resource_id.clone(),
                        start,
                        end,
                        delay_mins: 0,
                    });
                    court.next_free_at = end + self.constraints.buffer();
                    self.queue.push(Reverse(court));
                    break;
                }
            }
        }

        self.queue.extend(rejected.into_iter().map(Reverse));
        placed.ok_or(attempts)
    }

    fn earliest_start(&self, court_free_at: DateTime<Utc>, contest: &Contest) -> DateTime<Utc> {
        let ready = contest
            .participant_ids()
            .into_iter()
            .filter_map(|id| self.rest_floors.get(id))
            .fold(court_free_at, |acc, &floor| acc.max(floor));
        let opening = at_hour(ready.date_naive(), self.constraints.working_hours_start);
        ready.max(opening)
    }

    fn check_slot(
        &self,
        resource_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<ViolationKind> {
        let date = start.date_naive();
        let closing = at_hour(date, self.constraints.working_hours_end);
        if end > closing {
            return Some(ViolationKind::OutsideWorkingHours { start, end });
        }

        let load = self
            .daily_load
            .get(&(resource_id.to_string(), date))
            .copied()
            .unwrap_or(0);
        if load >= self.constraints.max_contests_per_resource_per_day {
            return Some(ViolationKind::DailyCapReached {
                date,
                cap: self.constraints.max_contests_per_resource_per_day,
            });
        }

        None
    }

    fn bind(
        &mut self,
        contest: &Contest,
        resource_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) {
        let floor = end + self.constraints.minimum_rest();
        for id in contest.participant_ids() {
            let entry = self.rest_floors.entry(id.to_string()).or_insert(floor);
            *entry = (*entry).max(floor);
        }
        *self
            .daily_load
            .entry((resource_id.to_string(), start.date_naive()))
            .or_insert(0) += 1;
    }

    /// Rebuild the session state from `schedule` so later placements respect
    /// it. Court free times never move earlier than the schedule records.
    fn resume_from(&mut self, schedule: &Schedule) {
        let constraints = &schedule.constraints;
        let mut courts = schedule.availability.clone();
        self.rest_floors.clear();
        self.daily_load.clear();

        for placed in &schedule.scheduled {
            if let Some(court) = courts.iter_mut().find(|c| c.resource_id == placed.resource_id) {
                court.next_free_at = court.next_free_at.max(placed.end + constraints.buffer());
            }

            let floor = placed.end + constraints.minimum_rest();
            for id in placed.contest.participant_ids() {
                let entry = self.rest_floors.entry(id.to_string()).or_insert(floor);
                *entry = (*entry).max(floor);
            }

            *self
                .daily_load
                .entry((placed.resource_id.clone(), placed.start.date_naive()))
                .or_insert(0) += 1;
        }

        self.queue = courts.into_iter().map(Reverse).collect();
    }
}
