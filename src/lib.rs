//! Beach tennis tournament backend: library with models, stores, business logic and the REST API.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use api::{configure, AppState};
pub use config::{Config, ConfigError};
pub use logic::{
    advance_round, category_matches, champion, create_player, create_registration,
    create_tournament, generate_category_draw, generate_draw, record_result, schedule_match,
    set_payment_status, DrawResult, DrawSummary, PaymentSimulator, PixSettings, RoundSummary,
};
pub use models::{
    Category, CategoryKey, GameMatch, MatchId, MatchRecord, MatchStatus, PaymentStatus, Player,
    PlayerId, PlayerRef, Registration, Tournament, TournamentError, TournamentId,
};
pub use store::{InMemoryMatchStore, MatchStore, RecordStore, StoreError, Stores};
