//! Tournament state machine: start (Registration -> InProgress) and complete (InProgress -> Completed).

use crate::logic::pairing::{generate_next_round, RoundPairings};
use crate::logic::standings::recompute_standings;
use crate::models::{Tournament, TournamentError, TournamentStatus};

/// Reject any move the status table does not allow, naming why from where we stand.
fn check_transition(
    current: TournamentStatus,
    next: TournamentStatus,
) -> Result<(), TournamentError> {
    if current.can_transition_to(next) {
        return Ok(());
    }
    Err(match current {
        TournamentStatus::Registration => TournamentError::TournamentNotInProgress,
        TournamentStatus::InProgress => TournamentError::TournamentAlreadyStarted,
        TournamentStatus::Completed => TournamentError::TournamentClosed,
    })
}

/// Start the tournament: require 2 active participants, fix the round count if it was left
/// open, move to InProgress and pair round 1. On error nothing changes.
pub fn start_tournament(tournament: &mut Tournament) -> Result<RoundPairings, TournamentError> {
    check_transition(tournament.status, TournamentStatus::InProgress)?;
    let active = tournament.active_participants().count();
    if active < 2 {
        return Err(TournamentError::InsufficientPlayers { active });
    }

    let mut next = tournament.clone();
    if next.max_rounds.is_none() {
        next.max_rounds = Some(Tournament::recommended_rounds(active));
    }
    next.status = TournamentStatus::InProgress;
    let pairings = generate_next_round(&mut next)?;
    *tournament = next;

    log::info!(
        "Tournament {} started with {} players over {} round(s)",
        tournament.id,
        active,
        tournament.round_limit()
    );
    Ok(pairings)
}

/// Close the tournament. Without `force`, every scheduled round must have been paired and
/// played out. A forced close leaves unreported matches pending; they never score.
pub fn complete_tournament(tournament: &mut Tournament, force: bool) -> Result<(), TournamentError> {
    check_transition(tournament.status, TournamentStatus::Completed)?;
    if !force {
        let max_rounds = tournament.round_limit();
        if tournament.current_round < max_rounds {
            return Err(TournamentError::RoundsRemaining {
                current_round: tournament.current_round,
                max_rounds,
            });
        }
        let pending = tournament.pending_in_round(tournament.current_round);
        if pending > 0 {
            return Err(TournamentError::IncompleteResults {
                round: tournament.current_round,
                pending,
            });
        }
    }

    recompute_standings(tournament)?;
    tournament.status = TournamentStatus::Completed;
    log::info!(
        "Tournament {} completed after round {}{}",
        tournament.id,
        tournament.current_round,
        if force { " (closed early by organizer)" } else { "" }
    );
    Ok(())
}
