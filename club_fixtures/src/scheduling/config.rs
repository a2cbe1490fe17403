//! Scheduling constraints.

use super::errors::{SchedulingError, SchedulingResult};
use crate::env::env_or;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Hard constraints applied to every placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConstraints {
    /// Length of every contest in minutes
    pub contest_duration_mins: u32,

    /// Minimum gap between a participant's consecutive contests in minutes
    pub minimum_rest_mins: u32,

    /// Court turnover time after each contest in minutes
    pub buffer_mins: u32,

    /// First hour of play (0-23)
    pub working_hours_start: u32,

    /// Hour by which every contest must have ended (1-24)
    pub working_hours_end: u32,

    /// Contests one court may host on a single day
    pub max_contests_per_resource_per_day: u32,
}

impl Default for SchedulingConstraints {
    fn default() -> Self {
        Self {
            contest_duration_mins: 60,
            minimum_rest_mins: 30,
            buffer_mins: 15,
            working_hours_start: 8,
            working_hours_end: 22,
            max_contests_per_resource_per_day: 8,
        }
    }
}

impl SchedulingConstraints {
    /// Load constraints from `FIXTURES_*` environment variables, falling back
    /// to the defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            contest_duration_mins: env_or(
                "FIXTURES_CONTEST_DURATION_MINS",
                defaults.contest_duration_mins,
            ),
            minimum_rest_mins: env_or("FIXTURES_MINIMUM_REST_MINS", defaults.minimum_rest_mins),
            buffer_mins: env_or("FIXTURES_BUFFER_MINS", defaults.buffer_mins),
            working_hours_start: env_or(
                "FIXTURES_WORKING_HOURS_START",
                defaults.working_hours_start,
            ),
            working_hours_end: env_or("FIXTURES_WORKING_HOURS_END", defaults.working_hours_end),
            max_contests_per_resource_per_day: env_or(
                "FIXTURES_MAX_CONTESTS_PER_RESOURCE_PER_DAY",
                defaults.max_contests_per_resource_per_day,
            ),
        }
    }

    pub fn with_contest_duration(mut self, minutes: u32) -> Self {
        self.contest_duration_mins = minutes;
        self
    }

    pub fn with_minimum_rest(mut self, minutes: u32) -> Self {
        self.minimum_rest_mins = minutes;
        self
    }

    pub fn with_buffer(mut self, minutes: u32) -> Self {
        self.buffer_mins = minutes;
        self
    }

    pub fn with_working_hours(mut self, start: u32, end: u32) -> Self {
        self.working_hours_start = start;
        self.working_hours_end = end;
        self
    }

    pub fn with_max_contests_per_resource_per_day(mut self, max: u32) -> Self {
        self.max_contests_per_resource_per_day = max;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> SchedulingResult<()> {
        if self.contest_duration_mins == 0 {
            return Err(SchedulingError::InvalidInput(
                "contest duration must be positive".to_string(),
            ));
        }

        if self.working_hours_end > 24 || self.working_hours_start >= self.working_hours_end {
            return Err(SchedulingError::InvalidInput(format!(
                "working hours {}-{} are not a valid window",
                self.working_hours_start, self.working_hours_end
            )));
        }

        if self.contest_duration_mins > (self.working_hours_end - self.working_hours_start) * 60 {
            return Err(SchedulingError::InvalidInput(
                "contest duration exceeds the working day".to_string(),
            ));
        }

        if self.max_contests_per_resource_per_day == 0 {
            return Err(SchedulingError::InvalidInput(
                "max contests per resource per day must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn contest_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.contest_duration_mins))
    }

    pub fn minimum_rest(&self) -> Duration {
        Duration::minutes(i64::from(self.minimum_rest_mins))
    }

    pub fn buffer(&self) -> Duration {
        Duration::minutes(i64::from(self.buffer_mins))
    }
}
