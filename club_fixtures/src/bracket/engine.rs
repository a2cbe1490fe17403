//! Seeded bracket construction and result-driven advancement.

use super::errors::{BracketError, BracketResult};
use super::models::{Advancement, Bracket, BracketNode};
use crate::fixtures::{Entrant, Participant};
use std::collections::HashSet;
use uuid::Uuid;

/// Builds seeded single-elimination brackets.
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketEngine;

/// Seed number at each line position for a power-of-two field.
///
/// Built by interval halving: every seed `s` of the half-size order is
/// followed by its mirror `2m + 1 - s`, so seeds 1 and 2 land in opposite
/// halves, seeds 1-4 in different quarters, and so on.
pub fn seed_positions(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let doubled = order.len() * 2;
        order = order
            .iter()
            .flat_map(|&seed| [seed, doubled + 1 - seed])
            .collect();
    }
    order
}

impl BracketEngine {
    pub fn new() -> Self {
        Self
    }

    /// Build a bracket from a seeded field.
    ///
    /// Participants are ordered by seed rank; unranked participants follow the
    /// ranked ones in input order. The field is padded with BYEs to the next
    /// power of two, and since BYEs take the highest seed numbers they meet
    /// the top seeds, who advance straight to round two.
    ///
    /// # Errors
    ///
    /// * `BracketError::InvalidInput` - fewer than two participants, or a
    ///   repeated participant ID or seed rank
    pub fn build_bracket(&self, participants: &[Participant]) -> BracketResult<Bracket> {
        if participants.len() < 2 {
            return Err(BracketError::InvalidInput(
                "at least 2 participants are required for a knockout bracket".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        let mut seeds = HashSet::new();
        for participant in participants {
            if !ids.insert(participant.id.as_str()) {
                return Err(BracketError::InvalidInput(format!(
                    "duplicate participant id: {}",
                    participant.id
                )));
            }
            if let Some(seed) = participant.seed {
                if !seeds.insert(seed) {
                    return Err(BracketError::InvalidInput(format!("duplicate seed: {seed}")));
                }
            }
        }

        let mut ordered = participants.to_vec();
        ordered.sort_by_key(|p| (p.seed.is_none(), p.seed));

        let size = ordered.len().next_power_of_two();
        let round_count = size.trailing_zeros();
        let mut nodes: Vec<BracketNode> = (0..size - 1)
            .map(|i| BracketNode::new(i, round_count))
            .collect();

        let line: Vec<Entrant> = seed_positions(size)
            .into_iter()
            .map(|seed| match ordered.get(seed - 1) {
                Some(p) => Entrant::Participant(p.clone()),
                None => Entrant::Bye,
            })
            .collect();

        let first_leaf = size / 2 - 1;
        for (offset, sides) in line.chunks(2).enumerate() {
            nodes[first_leaf + offset].slots = [Some(sides[0].clone()), Some(sides[1].clone())];
        }

        let mut bracket = Bracket {
            id: Uuid::new_v4(),
            size,
            round_count,
            seeds: ordered,
            nodes,
        };

        for index in first_leaf..size - 1 {
            if let Some(winner) = bracket.nodes[index].try_walkover() {
                bracket.advance_from(index, winner);
            }
        }

        log::info!(
            "Built bracket {} for {} participants ({} rounds, {} byes)",
            bracket.id,
            participants.len(),
            round_count,
            size - participants.len()
        );

        Ok(bracket)
    }
}

impl Bracket {
    /// Record the winner of a match and move them up the tree.
    ///
    /// The winner fills the parent's first slot when this match is a left
    /// child (odd index) and the second slot when it is a right child. If the
    /// parent is thereby decided by a BYE, advancement continues upward.
    ///
    /// # Errors
    ///
    /// * `BracketError::UnknownMatch` - no match with `match_id`
    /// * `BracketError::AlreadyDecided` - the match has a result
    /// * `BracketError::InvalidWinner` - `winner_id` is in neither slot
    pub fn report_result(&mut self, match_id: &str, winner_id: &str) -> BracketResult<Advancement> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == match_id)
            .ok_or_else(|| BracketError::UnknownMatch(match_id.to_string()))?;

        let node = &mut self.nodes[index];
        if node.is_decided() {
            return Err(BracketError::AlreadyDecided(match_id.to_string()));
        }
        let winner = node
            .slot_of(winner_id)
            .and_then(|slot| node.slots[slot].as_ref())
            .and_then(Entrant::participant)
            .cloned()
            .ok_or_else(|| BracketError::InvalidWinner {
                match_id: match_id.to_string(),
                winner_id: winner_id.to_string(),
            })?;
        node.winner = Some(winner.clone());

        let advancement = self.advance_from(index, winner);
        if let Advancement::Champion(champion) = &advancement {
            log::info!("Bracket {} won by {}", self.id, champion.name);
        }
        Ok(advancement)
    }

    /// Carry `winner` of node `index` upward, applying walkovers.
    fn advance_from(&mut self, mut index: usize, mut winner: Participant) -> Advancement {
        loop {
            let Some((parent, slot)) = self.nodes[index].parent() else {
                return Advancement::Champion(winner);
            };

            self.nodes[parent].slots[slot] = Some(Entrant::Participant(winner));
            match self.nodes[parent].try_walkover() {
                Some(next) => {
                    winner = next;
                    index = parent;
                }
                None => {
                    return Advancement::Advanced {
                        next_match: self.nodes[parent].id.clone(),
                        slot,
                    };
                }
            }
        }
    }
}
