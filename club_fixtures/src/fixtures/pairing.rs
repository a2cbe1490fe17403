//! Single-round pairing with same-club avoidance.
//!
//! ## Search
//!
//! Depth-first backtracking over partial pairings, driven by an explicit stack
//! instead of recursion so depth is bounded by N/2 frames and the search can be
//! capped externally. At each level the lowest unpaired entrant is fixed and
//! every remaining entrant is tried as its partner, in input order. A branch is
//! pruned as soon as its accumulated penalty meets or exceeds the best complete
//! pairing found so far, and the search stops early once a zero-penalty pairing
//! is found.
//!
//! Worst case is O(N!) (a field drawn from a single club defeats pruning), so
//! callers should keep N small or pre-partition with
//! [`GroupingEngine`](super::grouping::GroupingEngine).

use super::ensure_unique_ids;
use super::entities::{Contest, Entrant, Participant, pair_penalty};
use super::errors::FixtureResult;
use serde::{Deserialize, Serialize};

/// Default cap on candidate expansions per search
pub const DEFAULT_MAX_ITERATIONS: u64 = 1_000_000;

/// Result of a pairing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingOutcome {
    /// Real contests, in the order the search paired them
    pub contests: Vec<Contest>,
    pub total_penalty: u32,
    /// Participant drawn against the BYE (odd fields only)
    pub bye: Option<Participant>,
    /// Candidate expansions performed
    pub iterations: u64,
    /// False when the iteration budget ran out before the space was exhausted
    pub search_complete: bool,
}

/// Backtracking pairing engine.
#[derive(Debug, Clone, Copy)]
pub struct PairingEngine {
    max_iterations: u64,
}

impl Default for PairingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// One level of the search: `first` is fixed, partners are tried from `cursor`.
struct Frame {
    first: usize,
    cursor: usize,
    partner: Option<usize>,
    cost: u32,
}

impl Frame {
    fn new(first: usize) -> Self {
        Self {
            first,
            cursor: first + 1,
            partner: None,
            cost: 0,
        }
    }
}

struct Search {
    pairs: Vec<(usize, usize)>,
    penalty: u32,
    iterations: u64,
    complete: bool,
}

impl PairingEngine {
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Cap the number of candidate expansions
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Pair every participant for a single round.
    ///
    /// An odd field gets a BYE appended; whoever draws it is returned in
    /// [`PairingOutcome::bye`] and not as a contest.
    ///
    /// Among pairings with equal penalty, the first one reached in input order
    /// wins: the result is deterministic for a given roster order, but
    /// reordering the roster may select a different optimal pairing.
    ///
    /// If the iteration budget runs out before any complete pairing was found,
    /// adjacent entrants are paired in input order and
    /// [`PairingOutcome::search_complete`] is false.
    ///
    /// # Errors
    ///
    /// * `FixtureError::InvalidInput` - participant IDs repeat
    pub fn pair(&self, participants: &[Participant]) -> FixtureResult<PairingOutcome> {
        ensure_unique_ids(participants.iter().map(|p| p.id.as_str()))?;

        let mut entrants: Vec<Entrant> = participants.iter().cloned().map(Entrant::from).collect();
        if entrants.len() % 2 == 1 {
            entrants.push(Entrant::Bye);
        }

        let search = self.search(&entrants);
        if !search.complete {
            log::warn!(
                "Pairing search stopped after {} iterations; returning best found (penalty {})",
                search.iterations,
                search.penalty
            );
        }

        let mut contests = Vec::with_capacity(search.pairs.len());
        let mut bye = None;
        for &(a, b) in &search.pairs {
            let contest = Contest::new(
                format!("pair-{}", contests.len() + 1),
                1,
                contests.len() as u32 + 1,
                entrants[a].clone(),
                entrants[b].clone(),
            );
            match contest.walkover_winner() {
                Some(winner) => bye = Some(winner.clone()),
                None => contests.push(contest),
            }
        }

        log::debug!(
            "Paired {} participants into {} contests (penalty {}, {} iterations)",
            participants.len(),
            contests.len(),
            search.penalty,
            search.iterations
        );

        Ok(PairingOutcome {
            contests,
            total_penalty: search.penalty,
            bye,
            iterations: search.iterations,
            search_complete: search.complete,
        })
    }

    fn search(&self, entrants: &[Entrant]) -> Search {
        let n = entrants.len();
        if n == 0 {
            return Search {
                pairs: Vec::new(),
                penalty: 0,
                iterations: 0,
                complete: true,
            };
        }

        let mut paired = vec![false; n];
        let mut current: Vec<(usize, usize)> = Vec::with_capacity(n / 2);
        let mut penalty = 0u32;
        let mut best: Option<(Vec<(usize, usize)>, u32)> = None;
        let mut iterations = 0u64;
        let mut exhausted_budget = false;

        paired[0] = true;
        let mut stack = vec![Frame::new(0)];

        'search: while let Some(top) = stack.len().checked_sub(1) {
            let frame = &mut stack[top];

            // Undo this level's previous choice before trying the next one
            if let Some(previous) = frame.partner.take() {
                paired[previous] = false;
                current.pop();
                penalty -= frame.cost;
            }

            let mut chosen = None;
            while frame.cursor < n {
                let candidate = frame.cursor;
                frame.cursor += 1;
                if paired[candidate] {
                    continue;
                }

                if iterations >= self.max_iterations {
                    exhausted_budget = true;
                    break 'search;
                }
                iterations += 1;

                let cost = pair_penalty(&entrants[frame.first], &entrants[candidate]);
                let bound = best.as_ref().map(|(_, b)| *b);
                if bound.is_some_and(|b| penalty + cost >= b) {
                    continue;
                }
                chosen = Some((candidate, cost));
                break;
            }

            let Some((candidate, cost)) = chosen else {
                paired[frame.first] = false;
                stack.pop();
                continue;
            };

            paired[candidate] = true;
            frame.partner = Some(candidate);
            frame.cost = cost;
            current.push((frame.first, candidate));
            penalty += cost;

            match paired.iter().position(|&p| !p) {
                Some(next) => {
                    paired[next] = true;
                    stack.push(Frame::new(next));
                }
                None => {
                    if best.as_ref().is_none_or(|(_, b)| penalty < *b) {
                        best = Some((current.clone(), penalty));
                    }
                    if penalty == 0 {
                        break 'search;
                    }
                }
            }
        }

        match best {
            Some((pairs, penalty)) => Search {
                pairs,
                penalty,
                iterations,
                complete: !exhausted_budget,
            },
            None => {
                let pairs: Vec<(usize, usize)> = (0..n).step_by(2).map(|i| (i, i + 1)).collect();
                let penalty = pairs
                    .iter()
                    .map(|&(a, b)| pair_penalty(&entrants[a], &entrants[b]))
                    .sum();
                Search {
                    pairs,
                    penalty,
                    iterations,
                    complete: false,
                }
            }
        }
    }
}
