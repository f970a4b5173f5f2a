//! Integration tests for the standings calculator: scoring, tiebreakers and ranking order.

use chrono::NaiveDate;
use swiss_tournament_web::{
    compare_standings, compute_standings, report_result, start_tournament, Bye, GameMatch,
    MatchOutcome, MatchStatus, NewTournament, Participant, ParticipantStatus, ScoringConfig,
    Tournament, TournamentDetails, TournamentError,
};
use uuid::Uuid;

const FLOOR: f64 = 1.0 / 3.0;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn roster(n: usize) -> Vec<Participant> {
    let mut players: Vec<Participant> = (0..n).map(|_| Participant::new(Uuid::new_v4())).collect();
    players.sort_by_key(|p| p.id);
    players
}

fn completed(round: u32, p1: &Participant, p2: &Participant, outcome: (u32, u32, u32)) -> GameMatch {
    let mut m = GameMatch::new(round, p1.id, p2.id);
    m.outcome = MatchOutcome::new(outcome.0, outcome.1, outcome.2);
    m.status = MatchStatus::Completed;
    m
}

fn tournament_with_players(n: usize) -> (Tournament, Uuid) {
    let organizer = Uuid::new_v4();
    let mut t = Tournament::new(
        NewTournament {
            details: TournamentDetails {
                name: "Friday Night Modern".into(),
                description: String::new(),
                format: "Modern".into(),
                date: NaiveDate::from_ymd_opt(2026, 10, 23).unwrap(),
                max_players: 16,
            },
            max_rounds: Some(3),
            organizer_id: organizer,
        },
        ScoringConfig::default(),
    )
    .unwrap();
    for _ in 0..n {
        t.register(Uuid::new_v4()).unwrap();
    }
    (t, organizer)
}

#[test]
fn points_follow_three_one_zero_scoring() {
    let p = roster(4);
    let matches = vec![
        completed(1, &p[0], &p[1], (2, 0, 0)),
        completed(1, &p[2], &p[3], (1, 1, 1)),
        completed(2, &p[0], &p[2], (0, 2, 0)),
        completed(2, &p[1], &p[3], (2, 1, 0)),
    ];
    let standings = compute_standings(&p, &matches, &[], &ScoringConfig::default()).unwrap();
    let row = |i: usize| standings.iter().find(|s| s.participant_id == p[i].id).unwrap();

    assert_eq!(row(0).points, 3);
    assert_eq!((row(0).matches_won, row(0).matches_lost), (1, 1));
    assert_eq!(row(1).points, 3);
    assert_eq!(row(2).points, 4);
    assert_eq!((row(2).matches_won, row(2).matches_drawn), (1, 1));
    assert_eq!(row(3).points, 1);
    assert_eq!((row(3).matches_drawn, row(3).matches_lost), (1, 1));
    for s in &standings {
        assert_eq!(s.matches_played, 2);
    }
}

#[test]
fn pending_matches_do_not_score() {
    let p = roster(2);
    let mut m = GameMatch::new(1, p[0].id, p[1].id);
    m.outcome = MatchOutcome::new(2, 0, 0);
    let standings = compute_standings(&p, &[m], &[], &ScoringConfig::default()).unwrap();
    assert!(standings.iter().all(|s| s.points == 0 && s.matches_played == 0));
}

#[test]
fn tiebreakers_are_floored_before_averaging() {
    let p = roster(2);
    let matches = vec![completed(1, &p[0], &p[1], (2, 0, 0))];
    let standings = compute_standings(&p, &matches, &[], &ScoringConfig::default()).unwrap();
    let winner = &standings[0];
    let loser = &standings[1];

    assert_eq!(winner.participant_id, p[0].id);
    assert!(approx(winner.gw_percentage, 1.0));
    // Loser's MWP is 0, floored to 1/3 before it becomes the winner's OMW%.
    assert!(approx(winner.omw_percentage, FLOOR));
    assert!(approx(loser.gw_percentage, FLOOR));
    assert!(approx(loser.omw_percentage, 1.0));
}

#[test]
fn percentages_stay_within_floor_and_one() {
    let p = roster(6);
    let matches = vec![
        completed(1, &p[0], &p[1], (2, 0, 0)),
        completed(1, &p[2], &p[3], (0, 2, 0)),
        completed(1, &p[4], &p[5], (1, 1, 1)),
        completed(2, &p[0], &p[3], (2, 1, 0)),
        completed(2, &p[1], &p[4], (0, 2, 0)),
        completed(2, &p[2], &p[5], (2, 0, 0)),
    ];
    let standings = compute_standings(&p, &matches, &[], &ScoringConfig::default()).unwrap();
    for s in &standings {
        assert!(s.gw_percentage >= FLOOR - 1e-12 && s.gw_percentage <= 1.0);
        assert!(s.omw_percentage >= FLOOR - 1e-12 && s.omw_percentage <= 1.0);
    }
}

#[test]
fn identical_records_are_ordered_by_participant_id() {
    let p = roster(4);
    let matches = vec![
        completed(1, &p[3], &p[2], (2, 0, 0)),
        completed(1, &p[1], &p[0], (2, 0, 0)),
    ];
    let standings = compute_standings(&p, &matches, &[], &ScoringConfig::default()).unwrap();
    let order: Vec<_> = standings.iter().map(|s| s.participant_id).collect();
    assert_eq!(order, vec![p[1].id, p[3].id, p[0].id, p[2].id]);
    assert_eq!(
        standings.iter().map(|s| s.rank).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    for pair in standings.windows(2) {
        assert_eq!(
            compare_standings(&pair[0], &pair[1]),
            std::cmp::Ordering::Less
        );
    }
}

#[test]
fn bye_counts_as_win_with_perfect_games() {
    let p = roster(3);
    let matches = vec![completed(1, &p[0], &p[1], (2, 1, 0))];
    let byes = vec![Bye {
        round: 1,
        participant_id: p[2].id,
    }];
    let standings = compute_standings(&p, &matches, &byes, &ScoringConfig::default()).unwrap();
    let bye_row = standings.iter().find(|s| s.participant_id == p[2].id).unwrap();
    assert_eq!(bye_row.points, 3);
    assert_eq!(bye_row.matches_won, 1);
    assert_eq!(bye_row.byes, 1);
    assert!(approx(bye_row.gw_percentage, 1.0));
    assert!(approx(bye_row.omw_percentage, FLOOR));
}

#[test]
fn bye_points_are_configurable() {
    let p = roster(1);
    let byes = vec![Bye {
        round: 1,
        participant_id: p[0].id,
    }];
    let scoring = ScoringConfig {
        bye_points: 1,
        ..ScoringConfig::default()
    };
    let standings = compute_standings(&p, &[], &byes, &scoring).unwrap();
    assert_eq!(standings[0].points, 1);
    assert_eq!(standings[0].matches_won, 1);
}

#[test]
fn dropped_players_are_hidden_but_still_count_as_opponents() {
    let mut p = roster(2);
    let matches = vec![completed(1, &p[0], &p[1], (0, 2, 0))];
    p[1].status = ParticipantStatus::Dropped;
    let standings = compute_standings(&p, &matches, &[], &ScoringConfig::default()).unwrap();
    assert_eq!(standings.len(), 1);
    assert_eq!(standings[0].participant_id, p[0].id);
    assert!(approx(standings[0].omw_percentage, 1.0));
}

#[test]
fn unknown_participant_is_inconsistent() {
    let p = roster(2);
    let stranger = Participant::new(Uuid::new_v4());
    let matches = vec![completed(1, &p[0], &stranger, (2, 0, 0))];
    assert!(matches!(
        compute_standings(&p, &matches, &[], &ScoringConfig::default()),
        Err(TournamentError::InconsistentMatchData(_))
    ));
}

#[test]
fn completed_match_without_games_is_inconsistent() {
    let p = roster(2);
    let matches = vec![completed(1, &p[0], &p[1], (0, 0, 0))];
    assert!(matches!(
        compute_standings(&p, &matches, &[], &ScoringConfig::default()),
        Err(TournamentError::InconsistentMatchData(_))
    ));
}

#[test]
fn self_pairing_is_inconsistent() {
    let p = roster(1);
    let matches = vec![completed(1, &p[0], &p[0], (2, 0, 0))];
    assert!(matches!(
        compute_standings(&p, &matches, &[], &ScoringConfig::default()),
        Err(TournamentError::InconsistentMatchData(_))
    ));
}

#[test]
fn five_players_first_round_scenario() {
    let (mut t, organizer) = tournament_with_players(5);
    let pairings = start_tournament(&mut t).unwrap();
    assert_eq!(pairings.pairs.len(), 2);
    let bye = pairings.bye.expect("odd field gives a bye");

    let round_one: Vec<GameMatch> = t.matches_in_round(1).cloned().collect();
    assert_eq!(round_one.len(), 2);
    report_result(&mut t, round_one[0].id, MatchOutcome::new(2, 0, 0), organizer).unwrap();
    report_result(&mut t, round_one[1].id, MatchOutcome::new(2, 1, 0), organizer).unwrap();

    let row = |id| t.standings.iter().find(|s| s.participant_id == id).unwrap();
    let clean_winner = row(round_one[0].player1_id);
    assert_eq!(clean_winner.points, 3);
    assert!(approx(clean_winner.gw_percentage, 1.0));

    let close_winner = row(round_one[1].player1_id);
    assert_eq!(close_winner.points, 3);
    assert!(approx(close_winner.gw_percentage, 2.0 / 3.0));

    let bye_row = row(bye);
    assert_eq!(bye_row.points, 3);
    assert!(approx(bye_row.gw_percentage, 1.0));

    assert_eq!(row(round_one[0].player2_id).points, 0);
    assert_eq!(row(round_one[1].player2_id).points, 0);
    assert_eq!(t.standings.len(), 5);
    assert_eq!(t.standings[4].points, 0);
}
