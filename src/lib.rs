//! Swiss tournament web app: library with models, pairing/standings logic and the REST API.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod service;
pub mod store;

pub use config::{ScoringConfig, ServerConfig};
pub use logic::{
    begin_match, compare_standings, complete_tournament, compute_standings, generate_next_round,
    pair_round, recompute_standings, report_result, start_tournament, PairingHistory,
    RoundPairings,
};
pub use models::{
    Bye, GameMatch, MatchId, MatchOutcome, MatchStatus, NewTournament, Participant,
    ParticipantId, ParticipantStatus, RoundView, Side, Standing, Tournament, TournamentDetails,
    TournamentError, TournamentId, TournamentStatus, TournamentSummary, UserId, BYE_GAME_WINS,
};
pub use service::{ServiceError, ServiceResult, TournamentService};
pub use store::{MemoryStore, StoreError, TournamentStore};
