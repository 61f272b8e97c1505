//! Data structures for the tournament backend: players, tournaments, registrations, matches.

mod game;
mod player;
mod registration;
mod tournament;

pub use game::{CategoryKey, GameMatch, MatchId, MatchRecord, MatchStatus, PlayerRef, BYE};
pub use player::{NewPlayer, Player, PlayerId, PlayerUpdate};
pub use registration::{
    CategoryEntry, NewRegistration, PaymentStatus, PixDetails, Registration, RegistrationId,
    RegistrationUpdate,
};
pub use tournament::{
    Category, NewTournament, Tournament, TournamentError, TournamentId, TournamentStatus,
    TournamentUpdate, MAX_ENTRY_FEE,
};
