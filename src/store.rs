//! Persistence contract for tournaments, plus the in-memory store used by the web binary.
//!
//! A tournament is stored as one aggregate (roster, matches, byes, standings), so a
//! `save` replaces all of it at once: either every change of an operation lands or none does.

use crate::models::{MatchId, Tournament, TournamentId, TournamentSummary};
use std::collections::HashMap;
use std::sync::RwLock;

/// Persistence-layer faults. Transient: the caller may retry the whole operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// The backing store could not be reached or refused the write.
    Unavailable(String),
    /// Stored data could not be read back.
    Corrupted(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(reason) => write!(f, "Storage unavailable: {}", reason),
            StoreError::Corrupted(reason) => write!(f, "Stored data is corrupted: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read/write access to tournament aggregates keyed by tournament id.
pub trait TournamentStore: Send + Sync {
    fn load(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError>;

    /// Insert or fully replace the aggregate.
    fn save(&self, tournament: &Tournament) -> Result<(), StoreError>;

    /// Returns false if there was nothing to delete.
    fn delete(&self, id: TournamentId) -> Result<bool, StoreError>;

    fn list(&self) -> Result<Vec<TournamentSummary>, StoreError>;

    /// Tournament owning the given match.
    fn tournament_for_match(&self, match_id: MatchId) -> Result<Option<TournamentId>, StoreError>;
}

/// In-memory state: many tournaments by ID.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tournaments: RwLock<HashMap<TournamentId, Tournament>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error() -> StoreError {
    StoreError::Unavailable("lock error".into())
}

impl TournamentStore for MemoryStore {
    fn load(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        let g = self.tournaments.read().map_err(|_| lock_error())?;
        Ok(g.get(&id).cloned())
    }

    fn save(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let mut g = self.tournaments.write().map_err(|_| lock_error())?;
        g.insert(tournament.id, tournament.clone());
        Ok(())
    }

    fn delete(&self, id: TournamentId) -> Result<bool, StoreError> {
        let mut g = self.tournaments.write().map_err(|_| lock_error())?;
        Ok(g.remove(&id).is_some())
    }

    fn list(&self) -> Result<Vec<TournamentSummary>, StoreError> {
        let g = self.tournaments.read().map_err(|_| lock_error())?;
        let mut summaries: Vec<TournamentSummary> = g.values().map(Tournament::summary).collect();
        summaries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(summaries)
    }

    fn tournament_for_match(&self, match_id: MatchId) -> Result<Option<TournamentId>, StoreError> {
        let g = self.tournaments.read().map_err(|_| lock_error())?;
        Ok(g
            .values()
            .find(|t| t.get_match(match_id).is_some())
            .map(|t| t.id))
    }
}
