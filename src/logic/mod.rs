//! Tournament business logic: standings, Swiss pairing, lifecycle and result reporting.

mod lifecycle;
mod pairing;
mod results;
mod standings;

pub use lifecycle::{complete_tournament, start_tournament};
pub use pairing::{generate_next_round, pair_round, PairingHistory, RoundPairings};
pub use results::{begin_match, report_result};
pub use standings::{compare_standings, compute_standings, recompute_standings};
