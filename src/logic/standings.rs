//! Standings: points, records and tiebreakers derived from the match history.

use crate::config::ScoringConfig;
use crate::models::{
    Bye, GameMatch, Participant, ParticipantId, Side, Standing, Tournament, TournamentError,
    BYE_GAME_WINS,
};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Running totals for one participant while walking the history.
#[derive(Default)]
struct Record {
    points: u32,
    won: u32,
    lost: u32,
    drawn: u32,
    byes: u32,
    games_won: u32,
    games_played: u32,
    /// One entry per match played against a real opponent (byes excluded).
    opponents: Vec<ParticipantId>,
}

impl Record {
    fn matches_played(&self) -> u32 {
        self.won + self.lost + self.drawn
    }
}

/// Ranking order: points, OMW%, GWP (all descending), then participant id ascending.
/// Never returns `Equal` for two different participants.
pub fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.omw_percentage.total_cmp(&a.omw_percentage))
        .then_with(|| b.gw_percentage.total_cmp(&a.gw_percentage))
        .then_with(|| a.participant_id.cmp(&b.participant_id))
}

/// Build the ranked standings for every active participant.
///
/// Only `completed` matches score. Byes count as a match won worth `bye_points` and a
/// 2-0 game record. Dropped or disqualified participants are left out of the result but
/// still feed their opponents' OMW%.
pub fn compute_standings(
    participants: &[Participant],
    matches: &[GameMatch],
    byes: &[Bye],
    scoring: &ScoringConfig,
) -> Result<Vec<Standing>, TournamentError> {
    let mut records: HashMap<ParticipantId, Record> = participants
        .iter()
        .map(|p| (p.id, Record::default()))
        .collect();

    for m in matches {
        if m.player1_id == m.player2_id {
            return Err(TournamentError::InconsistentMatchData(format!(
                "match {} pairs participant {} against themself",
                m.id, m.player1_id
            )));
        }
        for pid in [m.player1_id, m.player2_id] {
            if !records.contains_key(&pid) {
                return Err(TournamentError::InconsistentMatchData(format!(
                    "match {} references unknown participant {}",
                    m.id, pid
                )));
            }
        }
        if !m.is_completed() {
            continue;
        }
        if m.outcome.is_empty() {
            return Err(TournamentError::InconsistentMatchData(format!(
                "completed match {} has no games recorded",
                m.id
            )));
        }
        let Some(games) = m.outcome.games_played() else {
            return Err(TournamentError::InconsistentMatchData(format!(
                "completed match {} records more games than can be counted",
                m.id
            )));
        };
        apply_match(&mut records, m, games, scoring);
    }

    for bye in byes {
        let record = records.get_mut(&bye.participant_id).ok_or_else(|| {
            TournamentError::InconsistentMatchData(format!(
                "round {} bye references unknown participant {}",
                bye.round, bye.participant_id
            ))
        })?;
        record.points = record.points.saturating_add(scoring.bye_points);
        record.won += 1;
        record.byes += 1;
        record.games_won = record.games_won.saturating_add(BYE_GAME_WINS);
        record.games_played = record.games_played.saturating_add(BYE_GAME_WINS);
    }

    let match_win: HashMap<ParticipantId, f64> = records
        .iter()
        .map(|(id, r)| {
            let available = scoring.points_available(r.matches_played());
            (*id, ratio(r.points, available, scoring))
        })
        .collect();

    let mut standings: Vec<Standing> = participants
        .iter()
        .filter(|p| p.is_active())
        .filter_map(|p| records.get(&p.id).map(|r| (p.id, r)))
        .map(|(id, r)| {
            let omw_percentage = if r.opponents.is_empty() {
                scoring.tiebreak_floor
            } else {
                // Each opponent's MWP is already floored.
                let total: f64 = r
                    .opponents
                    .iter()
                    .map(|o| match_win.get(o).copied().unwrap_or(scoring.tiebreak_floor))
                    .sum();
                scoring.floored(total / r.opponents.len() as f64)
            };
            Standing {
                rank: 0,
                participant_id: id,
                points: r.points,
                matches_played: r.matches_played(),
                matches_won: r.won,
                matches_lost: r.lost,
                matches_drawn: r.drawn,
                games_won: r.games_won,
                games_played: r.games_played,
                omw_percentage,
                gw_percentage: ratio(r.games_won, r.games_played, scoring),
                byes: r.byes,
            }
        })
        .collect();

    standings.sort_by(compare_standings);
    for (i, s) in standings.iter_mut().enumerate() {
        s.rank = i as u32 + 1;
    }
    Ok(standings)
}

/// Recompute and store the standings of `tournament` from its own history.
pub fn recompute_standings(tournament: &mut Tournament) -> Result<(), TournamentError> {
    tournament.standings = compute_standings(
        &tournament.participants,
        &tournament.matches,
        &tournament.byes,
        &tournament.scoring,
    )?;
    log::debug!(
        "Recomputed standings for tournament {} ({} rows)",
        tournament.id,
        tournament.standings.len()
    );
    Ok(())
}

/// Apply one completed match of `games` games to both players' records.
/// Game and point totals saturate rather than wrap.
fn apply_match(
    records: &mut HashMap<ParticipantId, Record>,
    m: &GameMatch,
    games: u32,
    scoring: &ScoringConfig,
) {
    let outcome = m.outcome;
    let sides = [
        (m.player1_id, m.player2_id, outcome.player1_wins, Side::One),
        (m.player2_id, m.player1_id, outcome.player2_wins, Side::Two),
    ];
    for (pid, opponent, games_won, side) in sides {
        if let Some(r) = records.get_mut(&pid) {
            match outcome.winner() {
                Some(w) if w == side => {
                    r.won += 1;
                    r.points = r.points.saturating_add(scoring.win_points);
                }
                Some(_) => r.lost += 1,
                None => {
                    r.drawn += 1;
                    r.points = r.points.saturating_add(scoring.draw_points);
                }
            }
            r.games_won = r.games_won.saturating_add(games_won);
            r.games_played = r.games_played.saturating_add(games);
            r.opponents.push(opponent);
        }
    }
}

/// `num / den` floored; the floor itself when nothing has been played.
fn ratio(num: u32, den: u32, scoring: &ScoringConfig) -> f64 {
    if den == 0 {
        scoring.tiebreak_floor
    } else {
        scoring.floored(num as f64 / den as f64)
    }
}
