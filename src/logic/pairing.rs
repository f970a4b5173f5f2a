//! Swiss pairing: match participants of similar standing, avoid rematches, hand out byes fairly.

use crate::logic::standings::{compute_standings, recompute_standings};
use crate::models::{
    Bye, GameMatch, ParticipantId, Tournament, TournamentError, TournamentStatus,
};
use std::collections::{HashMap, HashSet};

/// Backtracking steps allowed per bye candidate before falling back to relaxed pairing.
const SEARCH_BUDGET: u32 = 20_000;

/// Who has met whom, and how many byes each participant has had.
#[derive(Clone, Debug, Default)]
pub struct PairingHistory {
    played: HashSet<(ParticipantId, ParticipantId)>,
    byes: HashMap<ParticipantId, u32>,
}

impl PairingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History of every match (any status) and bye in the tournament.
    pub fn from_tournament(tournament: &Tournament) -> Self {
        let mut history = Self::new();
        for m in &tournament.matches {
            history.record_match(m.player1_id, m.player2_id);
        }
        for b in &tournament.byes {
            history.record_bye(b.participant_id);
        }
        history
    }

    pub fn record_match(&mut self, a: ParticipantId, b: ParticipantId) {
        self.played.insert(key(a, b));
    }

    pub fn record_bye(&mut self, participant: ParticipantId) {
        *self.byes.entry(participant).or_insert(0) += 1;
    }

    pub fn have_played(&self, a: ParticipantId, b: ParticipantId) -> bool {
        self.played.contains(&key(a, b))
    }

    pub fn byes_for(&self, participant: ParticipantId) -> u32 {
        self.byes.get(&participant).copied().unwrap_or(0)
    }
}

fn key(a: ParticipantId, b: ParticipantId) -> (ParticipantId, ParticipantId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Pairings for one round, in table order (highest-ranked table first).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RoundPairings {
    pub round: u32,
    pub pairs: Vec<(ParticipantId, ParticipantId)>,
    pub bye: Option<ParticipantId>,
    /// Pairs that repeat an earlier meeting because no rematch-free pairing was found.
    pub rematches: Vec<(ParticipantId, ParticipantId)>,
    /// The rematch-free search ran out of steps for some bye candidate, so a
    /// rematch-free pairing may exist that was not found.
    pub search_exhausted: bool,
}

/// Pair `ranked` (best first) for `round`.
///
/// With an odd count, the bye goes to the lowest-ranked participant among those with the
/// fewest byes so far. The rest are paired top-down, each with the highest-ranked remaining
/// participant they have not met, backtracking when that leaves someone stranded. If no
/// rematch-free pairing exists, each participant instead meets the closest-ranked
/// remaining opponent and the rematch is logged.
pub fn pair_round(
    round: u32,
    ranked: &[ParticipantId],
    history: &PairingHistory,
) -> Result<RoundPairings, TournamentError> {
    if ranked.len() < 2 {
        return Err(TournamentError::InsufficientPlayers {
            active: ranked.len(),
        });
    }

    let bye_candidates: Vec<Option<ParticipantId>> = if ranked.len() % 2 == 1 {
        let fewest = ranked
            .iter()
            .map(|id| history.byes_for(*id))
            .min()
            .unwrap_or(0);
        ranked
            .iter()
            .rev()
            .filter(|id| history.byes_for(**id) == fewest)
            .map(|id| Some(*id))
            .collect()
    } else {
        vec![None]
    };

    let mut search_exhausted = false;
    for &bye in &bye_candidates {
        let pool = without(ranked, bye);
        let mut budget = SEARCH_BUDGET;
        if let Some(pairs) = pair_fresh(&pool, history, &mut budget) {
            return Ok(RoundPairings {
                round,
                pairs,
                bye,
                rematches: Vec::new(),
                search_exhausted,
            });
        }
        if budget == 0 {
            search_exhausted = true;
        }
    }

    let reason = if search_exhausted {
        "search budget exhausted before a rematch-free pairing was found"
    } else {
        "no rematch-free pairing exists"
    };
    let bye = bye_candidates.first().copied().flatten();
    let pool = without(ranked, bye);
    let (pairs, rematches) = pair_relaxed(&pool, history);
    for (a, b) in &rematches {
        log::warn!(
            "Round {}: {}; pairing {} with {} again",
            round,
            reason,
            a,
            b
        );
    }
    Ok(RoundPairings {
        round,
        pairs,
        bye,
        rematches,
        search_exhausted,
    })
}

fn without(ranked: &[ParticipantId], skip: Option<ParticipantId>) -> Vec<ParticipantId> {
    ranked
        .iter()
        .copied()
        .filter(|id| Some(*id) != skip)
        .collect()
}

/// Depth-first search for a pairing with no rematches, preferring higher-ranked opponents.
fn pair_fresh(
    pool: &[ParticipantId],
    history: &PairingHistory,
    budget: &mut u32,
) -> Option<Vec<(ParticipantId, ParticipantId)>> {
    let Some((&top, rest)) = pool.split_first() else {
        return Some(Vec::new());
    };
    if *budget == 0 {
        return None;
    }
    *budget -= 1;
    for (i, &opponent) in rest.iter().enumerate() {
        if history.have_played(top, opponent) {
            continue;
        }
        let remaining: Vec<ParticipantId> = rest
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, id)| *id)
            .collect();
        if let Some(mut pairs) = pair_fresh(&remaining, history, budget) {
            pairs.insert(0, (top, opponent));
            return Some(pairs);
        }
    }
    None
}

/// Greedy top-down pairing that allows rematches with the closest-ranked opponent.
fn pair_relaxed(
    pool: &[ParticipantId],
    history: &PairingHistory,
) -> (
    Vec<(ParticipantId, ParticipantId)>,
    Vec<(ParticipantId, ParticipantId)>,
) {
    let mut remaining = pool.to_vec();
    let mut pairs = Vec::new();
    let mut rematches = Vec::new();
    while remaining.len() >= 2 {
        let top = remaining.remove(0);
        let idx = remaining
            .iter()
            .position(|id| !history.have_played(top, *id))
            .unwrap_or(0);
        let opponent = remaining.remove(idx);
        if history.have_played(top, opponent) {
            rematches.push((top, opponent));
        }
        pairs.push((top, opponent));
    }
    (pairs, rematches)
}

/// Pair the next round of an in-progress tournament and advance `current_round`.
///
/// 1. Require InProgress and a round left under `max_rounds`.
/// 2. Require every match of the current round to be completed.
/// 3. Rank active participants from fresh standings and pair them.
/// 4. Store the new pending matches and the bye, then refresh the standings.
pub fn generate_next_round(tournament: &mut Tournament) -> Result<RoundPairings, TournamentError> {
    if tournament.status != TournamentStatus::InProgress {
        return Err(TournamentError::TournamentNotInProgress);
    }
    if tournament.current_round >= tournament.round_limit() {
        return Err(TournamentError::TournamentNotInProgress);
    }
    let current = tournament.current_round;
    if current > 0 && tournament.pending_in_round(current) > 0 {
        return Err(TournamentError::RoundAlreadyGenerated(current));
    }
    let target = current + 1;
    if tournament.matches_in_round(target).next().is_some()
        || tournament.bye_in_round(target).is_some()
    {
        return Err(TournamentError::RoundAlreadyGenerated(target));
    }

    let standings = compute_standings(
        &tournament.participants,
        &tournament.matches,
        &tournament.byes,
        &tournament.scoring,
    )?;
    let ranked: Vec<ParticipantId> = standings.iter().map(|s| s.participant_id).collect();
    let pairings = pair_round(target, &ranked, &PairingHistory::from_tournament(tournament))?;

    tournament.matches.extend(
        pairings
            .pairs
            .iter()
            .map(|(a, b)| GameMatch::new(target, *a, *b)),
    );
    if let Some(participant_id) = pairings.bye {
        tournament.byes.push(Bye {
            round: target,
            participant_id,
        });
    }
    tournament.current_round = target;
    recompute_standings(tournament)?;

    log::info!(
        "Tournament {}: generated round {} ({} matches, bye: {:?}, rematches: {})",
        tournament.id,
        target,
        pairings.pairs.len(),
        pairings.bye,
        pairings.rematches.len()
    );
    Ok(pairings)
}
