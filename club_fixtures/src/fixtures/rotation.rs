//! Round-robin fixtures by the circle method.
//!
//! The first entrant is held fixed and the rest rotate one place per round
//! (last moves to front). Each round pairs position `i` with position
//! `n - 1 - i` of the full ordering, so for `n` entrants (BYE included when
//! the field is odd) there are `n - 1` rounds, every entrant appears exactly
//! once per round and every pair meets exactly once overall.

use super::ensure_unique_ids;
use super::entities::{Contest, Entrant, Participant, Round};
use super::errors::FixtureResult;
use serde::{Deserialize, Serialize};

/// A full round-robin schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRobin {
    pub rounds: Vec<Round>,
    /// Same-club meetings across all rounds
    pub total_penalty: u32,
    /// Whether a BYE was added to even out the field
    pub has_bye: bool,
}

impl RoundRobin {
    pub fn contests(&self) -> impl Iterator<Item = &Contest> {
        self.rounds.iter().flat_map(|r| r.contests.iter())
    }
}

/// Circle-method round-robin generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationEngine;

impl RotationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Generate every round of a single round-robin.
    ///
    /// Within a round, different-club contests are ordered before same-club
    /// ones (stable); this only changes traversal order for scheduling, never
    /// round membership. BYE contests stay in their round as walkovers, so a
    /// single participant gets one round holding one walkover.
    ///
    /// # Errors
    ///
    /// * `FixtureError::InvalidInput` - participant IDs repeat
    pub fn generate_round_robin(&self, participants: &[Participant]) -> FixtureResult<RoundRobin> {
        ensure_unique_ids(participants.iter().map(|p| p.id.as_str()))?;

        if participants.is_empty() {
            return Ok(RoundRobin {
                rounds: Vec::new(),
                total_penalty: 0,
                has_bye: false,
            });
        }

        let mut entrants: Vec<Entrant> = participants.iter().cloned().map(Entrant::from).collect();
        let has_bye = entrants.len() % 2 == 1;
        if has_bye {
            entrants.push(Entrant::Bye);
        }

        let n = entrants.len();
        let fixed = entrants[0].clone();
        let mut rotating: Vec<Entrant> = entrants[1..].to_vec();
        let mut rounds = Vec::with_capacity(n - 1);

        for round_number in 1..=(n - 1) as u32 {
            let order: Vec<&Entrant> = std::iter::once(&fixed).chain(rotating.iter()).collect();

            let mut contests: Vec<Contest> = (0..n / 2)
                .map(|i| {
                    Contest::new(
                        String::new(),
                        round_number,
                        i as u32 + 1,
                        order[i].clone(),
                        order[n - 1 - i].clone(),
                    )
                })
                .collect();

            contests.sort_by_key(|c| c.penalty);
            for (position, contest) in contests.iter_mut().enumerate() {
                contest.sequence = position as u32 + 1;
                contest.id = format!("rr-{}-{}", round_number, contest.sequence);
            }

            rounds.push(Round {
                number: round_number,
                contests,
            });

            rotating.rotate_right(1);
        }

        let total_penalty = rounds.iter().map(Round::penalty).sum();
        log::info!(
            "Generated round robin for {} participants: {} rounds, penalty {}",
            participants.len(),
            rounds.len(),
            total_penalty
        );

        Ok(RoundRobin {
            rounds,
            total_penalty,
            has_bye,
        })
    }
}
