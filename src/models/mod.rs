//! Data structures for a Swiss tournament: participants, matches, byes, standings.

mod game;
mod participant;
mod standing;
mod tournament;

pub use game::{Bye, GameMatch, MatchId, MatchOutcome, MatchStatus, Side, BYE_GAME_WINS};
pub use participant::{Participant, ParticipantId, ParticipantStatus, UserId};
pub use standing::Standing;
pub use tournament::{
    NewTournament, RoundView, Tournament, TournamentDetails, TournamentError, TournamentId,
    TournamentStatus, TournamentSummary,
};
