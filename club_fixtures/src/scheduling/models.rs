//! Scheduling data models.

use super::config::SchedulingConstraints;
use crate::fixtures::{Contest, ContestId, ParticipantId};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource (court) ID type
pub type ResourceId = String;

/// An interchangeable court
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
}

impl Resource {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// When a court is next free.
///
/// Ordered by free time, then by the court's position in the input list, so
/// ties always break the same way.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceAvailability {
    pub next_free_at: DateTime<Utc>,
    pub resource_index: usize,
    pub resource_id: ResourceId,
}

/// A contest bound to a court and a time slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledContest {
    pub contest: Contest,
    pub resource_id: ResourceId,
    pub start: DateTime<Utc>,
    /// `start` + contest duration
    pub end: DateTime<Utc>,
    /// Minutes this contest has been pushed back by reported delays
    pub delay_mins: u32,
}

impl ScheduledContest {
    pub fn id(&self) -> &str {
        &self.contest.id
    }

    fn overlaps(&self, other: &ScheduledContest) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Minutes between the earlier contest's end and the later one's start
    fn gap_mins(&self, other: &ScheduledContest) -> i64 {
        if self.start <= other.start {
            (other.start - self.end).num_minutes()
        } else {
            (self.start - other.end).num_minutes()
        }
    }
}

/// What a violation is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationKind {
    /// The slot would run past the end of the working day
    OutsideWorkingHours {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// The court already hosts its daily maximum
    DailyCapReached { date: NaiveDate, cap: u32 },
    /// A participant's gap between two contests is below the minimum rest
    InsufficientRest {
        participant_id: ParticipantId,
        other_contest_id: ContestId,
        gap_mins: i64,
    },
    /// Two contests share a court at the same time
    ResourceOverlap { other_contest_id: ContestId },
}

/// A constraint that could not be honoured for one contest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingViolation {
    pub contest_id: ContestId,
    pub resource_id: Option<ResourceId>,
    pub kind: ViolationKind,
}

/// Why a contest was left unplaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// Every court was tried and rejected
    NoFeasibleResource { attempts: usize },
    /// Both sides are the same participant
    SameParticipant,
}

/// A contest that could not be scheduled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConflict {
    pub contest: Contest,
    pub reason: ConflictReason,
}

/// Summary figures for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStats {
    /// Minutes from the first start to the last end
    pub total_span_mins: i64,
    /// Percentage of the span each court spends hosting contests
    pub utilization: BTreeMap<ResourceId, f64>,
}

/// Output of a scheduling run; always partial-success
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Placed contests in placement order
    pub scheduled: Vec<ScheduledContest>,
    /// BYE contests; their participant advances without a slot
    pub walkovers: Vec<Contest>,
    pub conflicts: Vec<SchedulingConflict>,
    pub violations: Vec<SchedulingViolation>,
    /// Court availability after the run
    pub availability: Vec<ResourceAvailability>,
    pub constraints: SchedulingConstraints,
}

/// `date` at `hour` o'clock UTC; hour 24 is the following midnight
pub(crate) fn at_hour(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() + Duration::hours(i64::from(hour))
}

impl Schedule {
    pub fn get(&self, contest_id: &str) -> Option<&ScheduledContest> {
        self.scheduled.iter().find(|s| s.id() == contest_id)
    }

    /// Placed contests on one court, in start order
    pub fn on_resource(&self, resource_id: &str) -> Vec<&ScheduledContest> {
        let mut contests: Vec<&ScheduledContest> = self
            .scheduled
            .iter()
            .filter(|s| s.resource_id == resource_id)
            .collect();
        contests.sort_by_key(|s| s.start);
        contests
    }

    /// Placed contests for one participant, in start order
    pub fn for_participant(&self, participant_id: &str) -> Vec<&ScheduledContest> {
        let mut contests: Vec<&ScheduledContest> = self
            .scheduled
            .iter()
            .filter(|s| s.contest.involves(participant_id))
            .collect();
        contests.sort_by_key(|s| s.start);
        contests
    }

    pub fn is_fully_placed(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Re-check every placed contest against the constraints.
    ///
    /// Reports court overlaps, rest gaps below the minimum and contests
    /// running past the end of the working day. Each offending pair is
    /// reported once, against the later contest.
    pub fn audit(&self) -> Vec<SchedulingViolation> {
        let min_rest = i64::from(self.constraints.minimum_rest_mins);
        let mut violations = Vec::new();

        for contest in &self.scheduled {
            let closing = at_hour(contest.start.date_naive(), self.constraints.working_hours_end);
            if contest.end > closing {
                violations.push(SchedulingViolation {
                    contest_id: contest.id().to_string(),
                    resource_id: Some(contest.resource_id.clone()),
                    kind: ViolationKind::OutsideWorkingHours {
                        start: contest.start,
                        end: contest.end,
                    },
                });
            }
        }

        for (i, a) in self.scheduled.iter().enumerate() {
            for b in &self.scheduled[i + 1..] {
                let (earlier, later) = if b.start < a.start { (b, a) } else { (a, b) };

                if earlier.resource_id == later.resource_id && earlier.overlaps(later) {
                    violations.push(SchedulingViolation {
                        contest_id: later.id().to_string(),
                        resource_id: Some(later.resource_id.clone()),
                        kind: ViolationKind::ResourceOverlap {
                            other_contest_id: earlier.id().to_string(),
                        },
                    });
                }

                for participant_id in later.contest.participant_ids() {
                    if !earlier.contest.involves(participant_id) {
                        continue;
                    }
                    let gap_mins = earlier.gap_mins(later);
                    if gap_mins < min_rest {
                        violations.push(SchedulingViolation {
                            contest_id: later.id().to_string(),
                            resource_id: Some(later.resource_id.clone()),
                            kind: ViolationKind::InsufficientRest {
                                participant_id: participant_id.to_string(),
                                other_contest_id: earlier.id().to_string(),
                                gap_mins,
                            },
                        });
                    }
                }
            }
        }

        violations
    }

    pub fn stats(&self) -> ScheduleStats {
        let first_start = self.scheduled.iter().map(|s| s.start).min();
        let last_end = self.scheduled.iter().map(|s| s.end).max();
        let total_span_mins = match (first_start, last_end) {
            (Some(start), Some(end)) => (end - start).num_minutes(),
            _ => 0,
        };

        let utilization = self
            .availability
            .iter()
            .map(|a| {
                let busy: i64 = self
                    .on_resource(&a.resource_id)
                    .iter()
                    .map(|s| (s.end - s.start).num_minutes())
                    .sum();
                let pct = if total_span_mins > 0 {
                    busy as f64 / total_span_mins as f64 * 100.0
                } else {
                    0.0
                };
                (a.resource_id.clone(), pct)
            })
            .collect();

        ScheduleStats {
            total_span_mins,
            utilization,
        }
    }
}
