//! Tournament aggregate, TournamentStatus and the rule-rejection error type.

use crate::config::ScoringConfig;
use crate::logic::recompute_standings;
use crate::models::game::{Bye, GameMatch, MatchId, MatchStatus};
use crate::models::participant::{Participant, ParticipantId, ParticipantStatus, UserId};
use crate::models::standing::Standing;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Reasons an action is rejected by the tournament rules. The tournament is left untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Match history references an unknown participant or carries impossible counters.
    InconsistentMatchData(String),
    /// Fewer than two active participants to pair.
    InsufficientPlayers { active: usize },
    /// Pairings for this round already exist.
    RoundAlreadyGenerated(u32),
    /// Not in progress, or every scheduled round has already been paired.
    TournamentNotInProgress,
    /// Tournament is completed; nothing may change.
    TournamentClosed,
    /// Start was requested for a tournament that is already running.
    TournamentAlreadyStarted,
    MatchAlreadyCompleted(MatchId),
    /// Reporter is neither a player in the match nor the organizer.
    UnauthorizedReporter,
    /// All counters zero, or more games than a `u32` can count.
    InvalidResult,
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    ParticipantNotFound(ParticipantId),
    /// Registration is only possible while the tournament is in `registration`.
    RegistrationClosed,
    AlreadyRegistered,
    NotRegistered,
    TournamentFull { max_players: u32 },
    /// Matches of the round still have no result.
    IncompleteResults { round: u32, pending: usize },
    /// Scheduled rounds remain; completion needs `force`.
    RoundsRemaining { current_round: u32, max_rounds: u32 },
    MatchNotInCurrentRound { round: u32, current_round: u32 },
    /// Only the organizer (or, where allowed, the participant themself) may do this.
    NotOrganizer,
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Name, format or capacity rejected.
    InvalidDetails(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InconsistentMatchData(detail) => {
                write!(f, "Inconsistent match data: {}", detail)
            }
            TournamentError::InsufficientPlayers { active } => {
                write!(f, "Need at least 2 active players to pair (have {})", active)
            }
            TournamentError::RoundAlreadyGenerated(round) => {
                write!(f, "Pairings for round {} have already been generated", round)
            }
            TournamentError::TournamentNotInProgress => write!(f, "Tournament is not in progress"),
            TournamentError::TournamentClosed => write!(f, "Tournament is completed"),
            TournamentError::TournamentAlreadyStarted => {
                write!(f, "Tournament has already started")
            }
            TournamentError::MatchAlreadyCompleted(_) => {
                write!(f, "A result has already been reported for this match")
            }
            TournamentError::UnauthorizedReporter => {
                write!(f, "Only the players of this match or the organizer may report it")
            }
            TournamentError::InvalidResult => {
                write!(f, "A result must record at least one game won or drawn")
            }
            TournamentError::TournamentNotFound(_) => write!(f, "No tournament"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::ParticipantNotFound(_) => write!(f, "Participant not found"),
            TournamentError::RegistrationClosed => write!(f, "Registration is closed"),
            TournamentError::AlreadyRegistered => {
                write!(f, "You are already registered for this tournament")
            }
            TournamentError::NotRegistered => {
                write!(f, "You are not registered for this tournament")
            }
            TournamentError::TournamentFull { max_players } => {
                write!(f, "This tournament is already full ({} players)", max_players)
            }
            TournamentError::IncompleteResults { round, pending } => {
                write!(f, "Round {} still has {} match(es) without a result", round, pending)
            }
            TournamentError::RoundsRemaining {
                current_round,
                max_rounds,
            } => write!(
                f,
                "Only {} of {} rounds have been played",
                current_round, max_rounds
            ),
            TournamentError::MatchNotInCurrentRound {
                round,
                current_round,
            } => write!(
                f,
                "Match belongs to round {} but the current round is {}",
                round, current_round
            ),
            TournamentError::NotOrganizer => write!(f, "Only the organizer may do this"),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::InvalidDetails(reason) => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle of a tournament. Only ever moves forward.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Accepting registrations; no rounds yet.
    #[default]
    Registration,
    /// Rounds are being paired and played.
    InProgress,
    /// Finished; results and standings are frozen.
    Completed,
}

impl TournamentStatus {
    /// `registration → in_progress → completed`, plus the organizer's early close
    /// straight from `in_progress`. Nothing returns to `registration`.
    pub fn can_transition_to(self, next: TournamentStatus) -> bool {
        use TournamentStatus::*;
        matches!((self, next), (Registration, InProgress) | (InProgress, Completed))
    }
}

/// Organizer-editable description of an event.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentDetails {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Game format, e.g. "Modern" or "Commander".
    pub format: String,
    pub date: NaiveDate,
    pub max_players: u32,
}

impl TournamentDetails {
    /// Trim text fields and reject empty names/formats or a capacity below two.
    fn normalized(mut self) -> Result<Self, TournamentError> {
        self.name = self.name.trim().to_string();
        self.format = self.format.trim().to_string();
        self.description = self.description.trim().to_string();
        if self.name.is_empty() {
            return Err(TournamentError::InvalidDetails("Name is required.".into()));
        }
        if self.format.is_empty() {
            return Err(TournamentError::InvalidDetails("Format is required.".into()));
        }
        if self.max_players < 2 {
            return Err(TournamentError::InvalidDetails(
                "Tournament must allow at least 2 players.".into(),
            ));
        }
        Ok(self)
    }
}

/// Everything needed to create a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewTournament {
    #[serde(flatten)]
    pub details: TournamentDetails,
    /// `None` picks the usual Swiss length for the head count at start.
    #[serde(default)]
    pub max_rounds: Option<u32>,
    pub organizer_id: UserId,
}

/// List view of a tournament (no matches or standings).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub name: String,
    pub format: String,
    pub date: NaiveDate,
    pub max_players: u32,
    pub participants: usize,
    pub status: TournamentStatus,
    pub current_round: u32,
    pub max_rounds: Option<u32>,
    pub organizer_id: UserId,
}

/// One round's matches and bye, for display.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundView {
    pub round: u32,
    pub matches: Vec<GameMatch>,
    pub bye: Option<ParticipantId>,
}

/// Full tournament state: roster, match history, byes and derived standings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    #[serde(flatten)]
    pub details: TournamentDetails,
    pub organizer_id: UserId,
    pub status: TournamentStatus,
    /// Last round that has been paired; 0 before the first pairing.
    pub current_round: u32,
    /// Fixed at creation or, if left open, when the tournament starts.
    pub max_rounds: Option<u32>,
    pub scoring: ScoringConfig,
    pub participants: Vec<Participant>,
    pub matches: Vec<GameMatch>,
    pub byes: Vec<Bye>,
    /// Ranked; owned by the standings calculator.
    pub standings: Vec<Standing>,
}

impl Tournament {
    /// Create a new tournament in Registration state with no participants.
    pub fn new(new: NewTournament, scoring: ScoringConfig) -> Result<Self, TournamentError> {
        if new.max_rounds == Some(0) {
            return Err(TournamentError::InvalidDetails(
                "Tournament must have at least 1 round.".into(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            details: new.details.normalized()?,
            organizer_id: new.organizer_id,
            status: TournamentStatus::Registration,
            current_round: 0,
            max_rounds: new.max_rounds,
            scoring,
            participants: Vec::new(),
            matches: Vec::new(),
            byes: Vec::new(),
            standings: Vec::new(),
        })
    }

    /// Usual Swiss length: enough rounds to separate a single undefeated player.
    pub fn recommended_rounds(active_players: usize) -> u32 {
        let mut rounds = 0;
        while (1usize << rounds) < active_players {
            rounds += 1;
        }
        rounds.max(1)
    }

    pub fn summary(&self) -> TournamentSummary {
        TournamentSummary {
            id: self.id,
            name: self.details.name.clone(),
            format: self.details.format.clone(),
            date: self.details.date,
            max_players: self.details.max_players,
            participants: self.participants.len(),
            status: self.status,
            current_round: self.current_round,
            max_rounds: self.max_rounds,
            organizer_id: self.organizer_id,
        }
    }

    pub fn is_organizer(&self, user: UserId) -> bool {
        self.organizer_id == user
    }

    pub fn require_organizer(&self, user: UserId) -> Result<(), TournamentError> {
        if self.is_organizer(user) {
            Ok(())
        } else {
            Err(TournamentError::NotOrganizer)
        }
    }

    /// Round cap; 0 until it has been fixed.
    pub fn round_limit(&self) -> u32 {
        self.max_rounds.unwrap_or(0)
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_by_user(&self, user: UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user)
    }

    /// Participants still eligible for pairing.
    pub fn active_participants(&self) -> impl Iterator<Item = &Participant> + '_ {
        self.participants.iter().filter(|p| p.is_active())
    }

    pub fn get_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    pub fn matches_in_round(&self, round: u32) -> impl Iterator<Item = &GameMatch> + '_ {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Number of matches in `round` still waiting for a result.
    pub fn pending_in_round(&self, round: u32) -> usize {
        self.matches_in_round(round)
            .filter(|m| m.status != MatchStatus::Completed)
            .count()
    }

    pub fn bye_in_round(&self, round: u32) -> Option<ParticipantId> {
        self.byes
            .iter()
            .find(|b| b.round == round)
            .map(|b| b.participant_id)
    }

    /// Matches and byes grouped by round, ascending.
    pub fn rounds(&self) -> Vec<RoundView> {
        let mut by_round: BTreeMap<u32, Vec<GameMatch>> = BTreeMap::new();
        for m in &self.matches {
            by_round.entry(m.round).or_default().push(m.clone());
        }
        for b in &self.byes {
            by_round.entry(b.round).or_default();
        }
        by_round
            .into_iter()
            .map(|(round, matches)| RoundView {
                round,
                matches,
                bye: self.bye_in_round(round),
            })
            .collect()
    }

    /// Replace the organizer-editable details (Registration only). Capacity may not drop below the head count.
    pub fn update_details(&mut self, details: TournamentDetails) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Registration {
            return Err(TournamentError::RegistrationClosed);
        }
        let details = details.normalized()?;
        if (details.max_players as usize) < self.participants.len() {
            return Err(TournamentError::InvalidDetails(format!(
                "{} players are already registered",
                self.participants.len()
            )));
        }
        self.details = details;
        Ok(())
    }

    /// Register a user (Registration only). One entry per user; capacity is `max_players`.
    pub fn register(&mut self, user: UserId) -> Result<ParticipantId, TournamentError> {
        if self.status != TournamentStatus::Registration {
            return Err(TournamentError::RegistrationClosed);
        }
        if self.participant_by_user(user).is_some() {
            return Err(TournamentError::AlreadyRegistered);
        }
        if self.participants.len() >= self.details.max_players as usize {
            return Err(TournamentError::TournamentFull {
                max_players: self.details.max_players,
            });
        }
        let participant = Participant::new(user);
        let id = participant.id;
        self.participants.push(participant);
        Ok(id)
    }

    /// Remove a user's registration (Registration only).
    pub fn withdraw(&mut self, user: UserId) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Registration {
            return Err(TournamentError::RegistrationClosed);
        }
        let idx = self
            .participants
            .iter()
            .position(|p| p.user_id == user)
            .ok_or(TournamentError::NotRegistered)?;
        self.participants.remove(idx);
        Ok(())
    }

    /// Drop a participant from future rounds (InProgress only). The participant or the organizer may do it.
    pub fn drop_participant(
        &mut self,
        participant_id: ParticipantId,
        actor: UserId,
    ) -> Result<(), TournamentError> {
        self.set_inactive(participant_id, actor, ParticipantStatus::Dropped)
    }

    /// Disqualify a participant (InProgress only, organizer only).
    pub fn disqualify_participant(
        &mut self,
        participant_id: ParticipantId,
        actor: UserId,
    ) -> Result<(), TournamentError> {
        self.require_organizer(actor)?;
        self.set_inactive(participant_id, actor, ParticipantStatus::Disqualified)
    }

    fn set_inactive(
        &mut self,
        participant_id: ParticipantId,
        actor: UserId,
        status: ParticipantStatus,
    ) -> Result<(), TournamentError> {
        match self.status {
            TournamentStatus::InProgress => {}
            TournamentStatus::Completed => return Err(TournamentError::TournamentClosed),
            TournamentStatus::Registration => return Err(TournamentError::TournamentNotInProgress),
        }
        let is_organizer = self.is_organizer(actor);
        let p = self
            .participants
            .iter_mut()
            .find(|p| p.id == participant_id)
            .ok_or(TournamentError::ParticipantNotFound(participant_id))?;
        if !is_organizer && p.user_id != actor {
            return Err(TournamentError::NotOrganizer);
        }
        if !p.is_active() {
            return Err(TournamentError::InvalidState);
        }
        p.status = status;
        recompute_standings(self)?;
        log::info!(
            "Participant {} is now {:?} in tournament {}",
            participant_id,
            status,
            self.id
        );
        Ok(())
    }
}
