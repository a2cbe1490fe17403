//! Core fixture entities shared by every engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Participant ID type
pub type ParticipantId = String;

/// Club (affiliation) ID type
pub type ClubId = String;

/// Contest ID type
pub type ContestId = String;

/// Display name used for the BYE placeholder.
pub const BYE_NAME: &str = "BYE";

/// A registered player.
///
/// Copied by value into every engine structure; engines never hold references
/// back into the caller's roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    /// Participant ID
    pub id: ParticipantId,
    /// Display name
    pub name: String,
    /// Club the participant plays for
    pub club_id: ClubId,
    /// Seed rank (1 = strongest), if ranked
    pub seed: Option<u32>,
}

impl Participant {
    /// Create an unseeded participant
    pub fn new(id: impl Into<String>, name: impl Into<String>, club_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            club_id: club_id.into(),
            seed: None,
        }
    }

    /// Attach a seed rank
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// One side of a contest: a real participant or the BYE placeholder.
///
/// The BYE has no club, so it never contributes to a penalty, and a
/// participant drawn against it advances without playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "participant", rename_all = "lowercase")]
pub enum Entrant {
    Participant(Participant),
    Bye,
}

impl Entrant {
    pub fn is_bye(&self) -> bool {
        matches!(self, Entrant::Bye)
    }

    /// The participant behind this entrant, `None` for the BYE
    pub fn participant(&self) -> Option<&Participant> {
        match self {
            Entrant::Participant(p) => Some(p),
            Entrant::Bye => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.participant().map(|p| p.id.as_str())
    }

    pub fn club_id(&self) -> Option<&str> {
        self.participant().map(|p| p.club_id.as_str())
    }
}

impl From<Participant> for Entrant {
    fn from(participant: Participant) -> Self {
        Entrant::Participant(participant)
    }
}

impl fmt::Display for Entrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entrant::Participant(p) => write!(f, "{}", p.name),
            Entrant::Bye => write!(f, "{BYE_NAME}"),
        }
    }
}

/// Same-club penalty for a pairing: 1 when both sides share a club, else 0.
///
/// A BYE never shares a club with anyone.
pub fn pair_penalty(home: &Entrant, away: &Entrant) -> u32 {
    match (home.club_id(), away.club_id()) {
        (Some(a), Some(b)) if a == b => 1,
        _ => 0,
    }
}

/// Contest lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContestStatus {
    /// Generated, not yet bound to a court
    Pending,
    /// Bound to a court and time slot
    Scheduled,
    /// One side is a BYE; the other side advances without playing
    Walkover,
}

/// A single one-on-one meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contest {
    /// Contest ID
    pub id: ContestId,
    /// Round number (1-indexed)
    pub round: u32,
    /// Position within the round (1-indexed)
    pub sequence: u32,
    pub home: Entrant,
    pub away: Entrant,
    /// 1 for a same-club meeting, else 0
    pub penalty: u32,
    pub status: ContestStatus,
}

impl Contest {
    /// Create a contest, deriving penalty and status from the entrants
    pub fn new(
        id: impl Into<String>,
        round: u32,
        sequence: u32,
        home: Entrant,
        away: Entrant,
    ) -> Self {
        let penalty = pair_penalty(&home, &away);
        let status = if home.is_bye() || away.is_bye() {
            ContestStatus::Walkover
        } else {
            ContestStatus::Pending
        };

        Self {
            id: id.into(),
            round,
            sequence,
            home,
            away,
            penalty,
            status,
        }
    }

    pub fn has_bye(&self) -> bool {
        self.home.is_bye() || self.away.is_bye()
    }

    /// The participant that advances automatically when drawn against a BYE
    pub fn walkover_winner(&self) -> Option<&Participant> {
        match (&self.home, &self.away) {
            (Entrant::Participant(p), Entrant::Bye) | (Entrant::Bye, Entrant::Participant(p)) => {
                Some(p)
            }
            _ => None,
        }
    }

    /// IDs of the real participants in this contest
    pub fn participant_ids(&self) -> Vec<&str> {
        [&self.home, &self.away]
            .into_iter()
            .filter_map(Entrant::id)
            .collect()
    }

    pub fn involves(&self, participant_id: &str) -> bool {
        self.home.id() == Some(participant_id) || self.away.id() == Some(participant_id)
    }
}

/// A balanced group of participants produced by grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group name (`group-1`, `group-2`, ...)
    pub id: String,
    pub members: Vec<Participant>,
    /// Members per club
    pub club_distribution: BTreeMap<ClubId, usize>,
    /// Sum over clubs of (count - 1) for every club with more than one member
    pub penalty: u32,
}

impl Group {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            id: format!("group-{}", index + 1),
            members: Vec::new(),
            club_distribution: BTreeMap::new(),
            penalty: 0,
        }
    }

    pub(crate) fn push(&mut self, participant: Participant) {
        *self
            .club_distribution
            .entry(participant.club_id.clone())
            .or_insert(0) += 1;
        self.members.push(participant);
        self.penalty = self
            .club_distribution
            .values()
            .map(|&count| count.saturating_sub(1) as u32)
            .sum();
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// One round of a round-robin: every entrant appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Round number (1-indexed)
    pub number: u32,
    pub contests: Vec<Contest>,
}

impl Round {
    /// Penalty over the real (non-BYE) contests of the round
    pub fn penalty(&self) -> u32 {
        self.contests.iter().map(|c| c.penalty).sum()
    }
}
