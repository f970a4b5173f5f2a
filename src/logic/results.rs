//! Result reporting: validate a reported outcome, close the match, refresh standings.

use crate::logic::standings::recompute_standings;
use crate::models::{
    GameMatch, MatchId, MatchOutcome, MatchStatus, Tournament, TournamentError, TournamentStatus,
    UserId,
};

/// Look up a current-round match that may still take a result, and check who is acting.
fn open_match_for(
    tournament: &Tournament,
    match_id: MatchId,
    actor: UserId,
) -> Result<&GameMatch, TournamentError> {
    match tournament.status {
        TournamentStatus::InProgress => {}
        TournamentStatus::Completed => return Err(TournamentError::TournamentClosed),
        TournamentStatus::Registration => return Err(TournamentError::TournamentNotInProgress),
    }
    let m = tournament
        .get_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;

    let plays_in_match = [m.player1_id, m.player2_id].iter().any(|pid| {
        tournament
            .participant(*pid)
            .is_some_and(|p| p.user_id == actor)
    });
    if !plays_in_match && !tournament.is_organizer(actor) {
        return Err(TournamentError::UnauthorizedReporter);
    }
    if m.is_completed() {
        return Err(TournamentError::MatchAlreadyCompleted(match_id));
    }
    if m.round != tournament.current_round {
        return Err(TournamentError::MatchNotInCurrentRound {
            round: m.round,
            current_round: tournament.current_round,
        });
    }
    Ok(m)
}

/// Record the outcome of a match and recompute the standings.
///
/// The reporter must play in the match or organize the tournament. The match must be
/// pending or in progress and belong to the current round. On error nothing changes.
pub fn report_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    outcome: MatchOutcome,
    reporter: UserId,
) -> Result<(), TournamentError> {
    open_match_for(tournament, match_id, reporter)?;
    if outcome.is_empty() || outcome.games_played().is_none() {
        return Err(TournamentError::InvalidResult);
    }

    let previous = tournament.get_match(match_id).cloned();
    if let Some(m) = tournament.get_match_mut(match_id) {
        m.outcome = outcome;
        m.status = MatchStatus::Completed;
        m.reported_by = Some(reporter);
    }
    if let Err(e) = recompute_standings(tournament) {
        if let (Some(prev), Some(m)) = (previous, tournament.get_match_mut(match_id)) {
            *m = prev;
        }
        return Err(e);
    }

    log::info!(
        "Tournament {}: match {} reported {}-{}-{} by {}",
        tournament.id,
        match_id,
        outcome.player1_wins,
        outcome.player2_wins,
        outcome.draws,
        reporter
    );
    Ok(())
}

/// Mark a pending match as being played.
pub fn begin_match(
    tournament: &mut Tournament,
    match_id: MatchId,
    actor: UserId,
) -> Result<(), TournamentError> {
    open_match_for(tournament, match_id, actor)?;
    if let Some(m) = tournament.get_match_mut(match_id) {
        if m.status == MatchStatus::Pending {
            m.status = MatchStatus::InProgress;
        }
    }
    Ok(())
}
