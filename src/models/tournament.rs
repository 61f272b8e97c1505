//! Tournament, its fee-bearing categories, and the error type shared by all operations.

use crate::models::game::MatchId;
use crate::models::player::PlayerId;
use crate::models::registration::RegistrationId;
use crate::store::StoreError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error("Tournament not found")]
    TournamentNotFound(TournamentId),
    #[error("Category '{0}' not found in tournament")]
    CategoryNotFound(String),
    #[error("Category '{0}' still has registrations or matches")]
    CategoryInUse(String),
    #[error("No confirmed players to generate a draw for this category")]
    NoConfirmedPlayers,
    /// A single confirmed player cannot form a match.
    #[error("Not enough players to form matches (need at least 2)")]
    InsufficientPlayers,
    #[error("Player not found")]
    PlayerNotFound(PlayerId),
    #[error("Registration not found")]
    RegistrationNotFound(RegistrationId),
    #[error("Match not found")]
    MatchNotFound(MatchId),
    #[error("A player with this email already exists")]
    DuplicateEmail,
    #[error("This player is already registered in this category of the tournament")]
    DuplicateRegistration,
    #[error("{0}")]
    Validation(String),
    #[error("Match already has a result")]
    MatchAlreadyFinished(MatchId),
    #[error("Winner must be one of the match's players")]
    WinnerNotInMatch,
    #[error("No draw has been generated for this category")]
    NoDraw,
    /// Some match of the current round has no result yet.
    #[error("Not all matches of round {round} have a result")]
    RoundIncomplete { round: u32 },
    #[error("The final has been played; the bracket is complete")]
    BracketComplete,
    #[error("Could not render payment code: {0}")]
    Render(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Largest fee a PIX charge can carry (13 characters with two decimals).
pub const MAX_ENTRY_FEE: f64 = 9_999_999_999.99;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle of a tournament as shown to organisers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    RegistrationOpen,
    RegistrationClosed,
    InProgress,
    Finished,
}

/// A competitive category inside a tournament (e.g. "Mixed B") with its entry fee.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub entry_fee: f64,
    pub slots: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub registration_deadline: NaiveDate,
    pub categories: Vec<Category>,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a tournament.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTournament {
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub registration_deadline: NaiveDate,
    pub categories: Vec<Category>,
    #[serde(default)]
    pub status: TournamentStatus,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub registration_deadline: Option<NaiveDate>,
    pub categories: Option<Vec<Category>>,
    pub status: Option<TournamentStatus>,
}

impl Tournament {
    pub fn new(new: NewTournament) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            location: new.location.trim().to_string(),
            start_date: new.start_date,
            end_date: new.end_date,
            registration_deadline: new.registration_deadline,
            categories: new.categories,
            status: new.status,
            created_at: Utc::now(),
        }
    }

    /// Look up a category by exact name.
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Apply an update. Returns true if any field changed.
    pub fn apply(&mut self, update: TournamentUpdate) -> bool {
        let before = self.clone();
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(location) = update.location {
            self.location = location.trim().to_string();
        }
        if let Some(date) = update.start_date {
            self.start_date = date;
        }
        if let Some(date) = update.end_date {
            self.end_date = date;
        }
        if let Some(date) = update.registration_deadline {
            self.registration_deadline = date;
        }
        if let Some(categories) = update.categories {
            self.categories = categories;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        *self != before
    }

    /// Check the invariants every stored tournament satisfies.
    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.name.is_empty() {
            return Err(TournamentError::Validation("Tournament name is required".into()));
        }
        if self.end_date < self.start_date {
            return Err(TournamentError::Validation(
                "End date must not be before start date".into(),
            ));
        }
        if self.categories.is_empty() {
            return Err(TournamentError::Validation(
                "Categories must be a non-empty list".into(),
            ));
        }
        for (i, category) in self.categories.iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(TournamentError::Validation("Every category needs a name".into()));
            }
            if !category.entry_fee.is_finite() || category.entry_fee < 0.0 {
                return Err(TournamentError::Validation(format!(
                    "Entry fee of category '{}' must be a non-negative number",
                    category.name
                )));
            }
            if category.entry_fee > MAX_ENTRY_FEE {
                return Err(TournamentError::Validation(format!(
                    "Entry fee of category '{}' must not exceed {MAX_ENTRY_FEE:.2}",
                    category.name
                )));
            }
            if self.categories[..i].iter().any(|c| c.name == category.name) {
                return Err(TournamentError::Validation(format!(
                    "Category '{}' is listed twice",
                    category.name
                )));
            }
        }
        Ok(())
    }
}
