//! Participant: a registrant's entry in one tournament.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in matches, byes and standings).
pub type ParticipantId = Uuid;

/// Identity of a registered site user: organizers, players and result reporters.
pub type UserId = Uuid;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    #[default]
    Registered,
    /// Left the event voluntarily; past matches still count.
    Dropped,
    /// Removed by the organizer; past matches still count.
    Disqualified,
}

/// A user entered into a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub user_id: UserId,
    pub status: ParticipantStatus,
    pub registered_at: DateTime<Utc>,
}

impl Participant {
    /// Create a new, registered participant for the given user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            status: ParticipantStatus::Registered,
            registered_at: Utc::now(),
        }
    }

    /// Still eligible for pairing and listed in the standings.
    pub fn is_active(&self) -> bool {
        self.status == ParticipantStatus::Registered
    }
}
