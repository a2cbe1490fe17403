//! Single-elimination bracket data models.

use crate::fixtures::{Contest, Entrant, Participant};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Match ID type
pub type MatchId = String;

/// One match of the tree.
///
/// Nodes live in a flat array in heap order: the root (final) is index 0 and
/// the children of node `i` are `2i + 1` (first slot) and `2i + 2` (second
/// slot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketNode {
    /// Match ID (`ko-<round>-<position>`)
    pub id: MatchId,
    /// Round number, 1 = first round, `round_count` = final
    pub round: u32,
    /// Position within the round (1-indexed, top to bottom)
    pub position: u32,
    /// Index in the flat node array
    pub index: usize,
    /// Both sides; `None` until the feeding match is decided
    pub slots: [Option<Entrant>; 2],
    /// A BYE never wins a node
    pub winner: Option<Participant>,
}

impl BracketNode {
    pub(crate) fn new(index: usize, round_count: u32) -> Self {
        let depth = (index + 1).ilog2();
        let round = round_count - depth;
        let position = (index + 2 - (1usize << depth)) as u32;

        Self {
            id: format!("ko-{round}-{position}"),
            round,
            position,
            index,
            slots: [None, None],
            winner: None,
        }
    }

    /// Parent index and the slot this node's winner fills there
    pub fn parent(&self) -> Option<(usize, usize)> {
        if self.index == 0 {
            None
        } else {
            let slot = if self.index % 2 == 1 { 0 } else { 1 };
            Some(((self.index - 1) / 2, slot))
        }
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    /// Both slots hold real participants and no result is in yet
    pub fn is_playable(&self) -> bool {
        self.winner.is_none()
            && self
                .slots
                .iter()
                .all(|s| s.as_ref().is_some_and(|e| !e.is_bye()))
    }

    /// The slot index holding `participant_id`, if any
    pub fn slot_of(&self, participant_id: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().and_then(Entrant::id) == Some(participant_id))
    }

    /// Resolve a participant-against-BYE meeting; returns the walkover winner
    /// if this node was decided now
    pub(crate) fn try_walkover(&mut self) -> Option<Participant> {
        if self.winner.is_some() {
            return None;
        }
        match &self.slots {
            [Some(Entrant::Bye), Some(Entrant::Participant(p))]
            | [Some(Entrant::Participant(p)), Some(Entrant::Bye)] => {
                let winner = p.clone();
                self.winner = Some(winner.clone());
                Some(winner)
            }
            _ => None,
        }
    }

    pub fn as_contest(&self) -> Option<Contest> {
        match &self.slots {
            [Some(home), Some(away)] => Some(Contest::new(
                self.id.clone(),
                self.round,
                self.position,
                home.clone(),
                away.clone(),
            )),
            _ => None,
        }
    }
}

/// Where a reported winner ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advancement {
    /// Written into `slot` of `next_match`; further walkovers already applied
    Advanced { next_match: MatchId, slot: usize },
    /// The final was decided
    Champion(Participant),
}

/// A seeded single-elimination bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub id: Uuid,
    /// Field size after padding to a power of two
    pub size: usize,
    pub round_count: u32,
    /// Participants in seed order
    pub seeds: Vec<Participant>,
    pub nodes: Vec<BracketNode>,
}

impl Bracket {
    pub fn node(&self, match_id: &str) -> Option<&BracketNode> {
        self.nodes.iter().find(|n| n.id == match_id)
    }

    /// Matches of one round, top to bottom
    pub fn round(&self, round: u32) -> Vec<&BracketNode> {
        self.nodes.iter().filter(|n| n.round == round).collect()
    }

    /// Matches ready to be scheduled: both sides known, no BYE, no result
    pub fn ready_contests(&self) -> Vec<Contest> {
        let mut contests: Vec<Contest> = self
            .nodes
            .iter()
            .filter(|n| n.is_playable())
            .filter_map(BracketNode::as_contest)
            .collect();
        contests.sort_by_key(|c| (c.round, c.sequence));
        contests
    }

    pub fn champion(&self) -> Option<&Participant> {
        self.nodes.first().and_then(|root| root.winner.as_ref())
    }

    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_numbering_for_eight() {
        // 8 players: 7 nodes, 3 rounds
        let nodes: Vec<BracketNode> = (0..7).map(|i| BracketNode::new(i, 3)).collect();
        assert_eq!(nodes[0].id, "ko-3-1");
        assert_eq!(nodes[1].id, "ko-2-1");
        assert_eq!(nodes[2].id, "ko-2-2");
        assert_eq!(nodes[3].id, "ko-1-1");
        assert_eq!(nodes[6].id, "ko-1-4");
    }

    #[test]
    fn test_parent_slot_follows_index_parity() {
        assert_eq!(BracketNode::new(0, 3).parent(), None);
        assert_eq!(BracketNode::new(3, 3).parent(), Some((1, 0)));
        assert_eq!(BracketNode::new(4, 3).parent(), Some((1, 1)));
        assert_eq!(BracketNode::new(5, 3).parent(), Some((2, 0)));
        assert_eq!(BracketNode::new(6, 3).parent(), Some((2, 1)));
    }

    #[test]
    fn test_walkover_only_against_bye() {
        let mut node = BracketNode::new(3, 3);
        node.slots = [
            Some(Participant::new("a", "A", "x").into()),
            Some(Entrant::Bye),
        ];
        assert_eq!(node.try_walkover().map(|p| p.id), Some("a".to_string()));
        assert_eq!(node.winner.as_ref().map(|p| p.id.as_str()), Some("a"));
        assert!(node.try_walkover().is_none());

        let mut node = BracketNode::new(4, 3);
        node.slots = [
            Some(Participant::new("a", "A", "x").into()),
            Some(Participant::new("b", "B", "y").into()),
        ];
        assert!(node.try_walkover().is_none());
        assert!(node.is_playable());
    }

    #[test]
    fn test_two_byes_never_decide_a_node() {
        let mut node = BracketNode::new(3, 3);
        node.slots = [Some(Entrant::Bye), Some(Entrant::Bye)];
        assert!(node.try_walkover().is_none());
        assert!(!node.is_decided());
        assert!(!node.is_playable());
    }
}
