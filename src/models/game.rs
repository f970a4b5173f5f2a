//! Match (game), Bye and reported outcomes for one-versus-one rounds.

use crate::models::participant::{ParticipantId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Games credited to a bye recipient: a bye reads as a 2-0 win.
pub const BYE_GAME_WINS: u32 = 2;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Game counts reported for a match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub player1_wins: u32,
    pub player2_wins: u32,
    #[serde(default)]
    pub draws: u32,
}

impl MatchOutcome {
    pub fn new(player1_wins: u32, player2_wins: u32, draws: u32) -> Self {
        Self {
            player1_wins,
            player2_wins,
            draws,
        }
    }

    /// Total games in the match; `None` if the counters overflow `u32`.
    pub fn games_played(&self) -> Option<u32> {
        self.player1_wins
            .checked_add(self.player2_wins)?
            .checked_add(self.draws)
    }

    /// A result must record at least one decisive game or a draw.
    pub fn is_empty(&self) -> bool {
        self.player1_wins == 0 && self.player2_wins == 0 && self.draws == 0
    }

    /// Which side won the match, or `None` for a drawn match.
    pub fn winner(&self) -> Option<Side> {
        use std::cmp::Ordering::*;
        match self.player1_wins.cmp(&self.player2_wins) {
            Greater => Some(Side::One),
            Less => Some(Side::Two),
            Equal => None,
        }
    }
}

/// Seat in a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    One,
    Two,
}

/// A single pairing between two distinct participants in one round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub round: u32,
    pub player1_id: ParticipantId,
    pub player2_id: ParticipantId,
    pub status: MatchStatus,
    /// Zeroed until a result is reported.
    pub outcome: MatchOutcome,
    pub reported_by: Option<UserId>,
}

impl GameMatch {
    pub fn new(round: u32, player1_id: ParticipantId, player2_id: ParticipantId) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            player1_id,
            player2_id,
            status: MatchStatus::Pending,
            outcome: MatchOutcome::default(),
            reported_by: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.player1_id == participant || self.player2_id == participant
    }
}

/// An automatic win with no opposing player.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bye {
    pub round: u32,
    pub participant_id: ParticipantId,
}
