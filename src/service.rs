//! Organizer and player actions, serialized per tournament.
//!
//! Every mutating action takes the tournament's lock, loads a fresh copy from the store,
//! applies the rules to that copy and saves it back whole. A rejection or a failed save
//! leaves the stored tournament exactly as it was. Different tournaments never share a lock.

use crate::config::ScoringConfig;
use crate::logic::{
    begin_match, complete_tournament, generate_next_round, report_result, start_tournament,
};
use crate::models::{
    MatchId, MatchOutcome, NewTournament, ParticipantId, RoundView, Standing, Tournament,
    TournamentDetails, TournamentError, TournamentId, TournamentSummary, UserId,
};
use crate::store::{StoreError, TournamentStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// What a caller sees when an action fails.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ServiceError {
    /// Rejected by the tournament rules; retrying the same request will not help.
    Rejected(TournamentError),
    /// Persistence fault; the operation had no effect and may be retried.
    Storage(StoreError),
}

impl ServiceError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Storage(_))
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Rejected(e) => write!(f, "{}", e),
            ServiceError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Rejected(e) => Some(e),
            ServiceError::Storage(e) => Some(e),
        }
    }
}

impl From<TournamentError> for ServiceError {
    fn from(e: TournamentError) -> Self {
        ServiceError::Rejected(e)
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Storage(e)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct TournamentService {
    store: Arc<dyn TournamentStore>,
    scoring: ScoringConfig,
    locks: Mutex<HashMap<TournamentId, Arc<Mutex<()>>>>,
}

impl TournamentService {
    pub fn new(store: Arc<dyn TournamentStore>, scoring: ScoringConfig) -> Self {
        Self {
            store,
            scoring,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, id: TournamentId) -> Arc<Mutex<()>> {
        // The guarded value is (), so a poisoned lock carries no broken state.
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(id).or_default().clone()
    }

    fn load_existing(&self, id: TournamentId) -> ServiceResult<Tournament> {
        self.store
            .load(id)?
            .ok_or(ServiceError::Rejected(TournamentError::TournamentNotFound(id)))
    }

    /// Run `op` on a fresh copy of the tournament under its lock; save only if `op` succeeds.
    fn mutate<T>(
        &self,
        id: TournamentId,
        op: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    ) -> ServiceResult<T> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut working = self.load_existing(id)?;
        let value = op(&mut working)?;
        self.store.save(&working)?;
        Ok(value)
    }

    // ---- administration ----

    pub fn create_tournament(&self, new: NewTournament) -> ServiceResult<Tournament> {
        let tournament = Tournament::new(new, self.scoring)?;
        self.store.save(&tournament)?;
        log::info!(
            "Created tournament {} ({}) for organizer {}",
            tournament.details.name,
            tournament.id,
            tournament.organizer_id
        );
        Ok(tournament)
    }

    pub fn list_tournaments(&self) -> ServiceResult<Vec<TournamentSummary>> {
        Ok(self.store.list()?)
    }

    pub fn tournament(&self, id: TournamentId) -> ServiceResult<Tournament> {
        self.load_existing(id)
    }

    pub fn update_details(
        &self,
        id: TournamentId,
        details: TournamentDetails,
        actor: UserId,
    ) -> ServiceResult<Tournament> {
        self.mutate(id, |t| {
            t.require_organizer(actor)?;
            t.update_details(details)?;
            Ok(t.clone())
        })
    }

    pub fn delete_tournament(&self, id: TournamentId, actor: UserId) -> ServiceResult<()> {
        let lock = self.lock_for(id);
        {
            let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
            let t = self.load_existing(id)?;
            t.require_organizer(actor)?;
            self.store.delete(id)?;
        }
        self.locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
        log::info!("Deleted tournament {}", id);
        Ok(())
    }

    // ---- registration ----

    pub fn register(&self, id: TournamentId, user: UserId) -> ServiceResult<Tournament> {
        self.mutate(id, |t| {
            t.register(user)?;
            Ok(t.clone())
        })
    }

    pub fn withdraw(&self, id: TournamentId, user: UserId) -> ServiceResult<Tournament> {
        self.mutate(id, |t| {
            t.withdraw(user)?;
            Ok(t.clone())
        })
    }

    pub fn drop_participant(
        &self,
        id: TournamentId,
        participant: ParticipantId,
        actor: UserId,
    ) -> ServiceResult<Tournament> {
        self.mutate(id, |t| {
            t.drop_participant(participant, actor)?;
            Ok(t.clone())
        })
    }

    pub fn disqualify_participant(
        &self,
        id: TournamentId,
        participant: ParticipantId,
        actor: UserId,
    ) -> ServiceResult<Tournament> {
        self.mutate(id, |t| {
            t.disqualify_participant(participant, actor)?;
            Ok(t.clone())
        })
    }

    // ---- rounds and results ----

    /// Registration -> InProgress, pairing round 1.
    pub fn start_tournament(&self, id: TournamentId, actor: UserId) -> ServiceResult<Tournament> {
        self.mutate(id, |t| {
            t.require_organizer(actor)?;
            start_tournament(t)?;
            Ok(t.clone())
        })
    }

    pub fn generate_next_round(&self, id: TournamentId, actor: UserId) -> ServiceResult<RoundView> {
        self.mutate(id, |t| {
            t.require_organizer(actor)?;
            let pairings = generate_next_round(t)?;
            Ok(RoundView {
                round: pairings.round,
                matches: t.matches_in_round(pairings.round).cloned().collect(),
                bye: pairings.bye,
            })
        })
    }

    pub fn complete_tournament(
        &self,
        id: TournamentId,
        actor: UserId,
        force: bool,
    ) -> ServiceResult<Tournament> {
        self.mutate(id, |t| {
            t.require_organizer(actor)?;
            complete_tournament(t, force)?;
            Ok(t.clone())
        })
    }

    fn owner_of(&self, match_id: MatchId) -> ServiceResult<TournamentId> {
        self.store
            .tournament_for_match(match_id)?
            .ok_or(ServiceError::Rejected(TournamentError::MatchNotFound(match_id)))
    }

    /// Record a match result; returns the refreshed standings.
    pub fn report_result(
        &self,
        match_id: MatchId,
        outcome: MatchOutcome,
        reporter: UserId,
    ) -> ServiceResult<Vec<Standing>> {
        let id = self.owner_of(match_id)?;
        self.mutate(id, |t| {
            report_result(t, match_id, outcome, reporter)?;
            Ok(t.standings.clone())
        })
    }

    pub fn begin_match(&self, match_id: MatchId, actor: UserId) -> ServiceResult<Tournament> {
        let id = self.owner_of(match_id)?;
        self.mutate(id, |t| {
            begin_match(t, match_id, actor)?;
            Ok(t.clone())
        })
    }

    // ---- read models ----

    /// Ranked standings; callers must not re-sort them.
    pub fn standings(&self, id: TournamentId) -> ServiceResult<Vec<Standing>> {
        Ok(self.load_existing(id)?.standings)
    }

    pub fn rounds(&self, id: TournamentId) -> ServiceResult<Vec<RoundView>> {
        Ok(self.load_existing(id)?.rounds())
    }
}
