//! Standing: derived ranking row for one participant.

use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// One row of the standings table. Always rebuilt from the match history, never edited.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based position in the ranked list.
    pub rank: u32,
    pub participant_id: ParticipantId,
    pub points: u32,
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub matches_drawn: u32,
    pub games_won: u32,
    pub games_played: u32,
    /// Opponent match-win percentage, in `[floor, 1.0]`.
    pub omw_percentage: f64,
    /// Game-win percentage, in `[floor, 1.0]`.
    pub gw_percentage: f64,
    pub byes: u32,
}
