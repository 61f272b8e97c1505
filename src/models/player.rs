//! Player records and the payloads used to create and update them.

use crate::models::game::PlayerRef;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player.
pub type PlayerId = Uuid;

/// A registered athlete.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub full_name: String,
    /// Unique across players (case-insensitive).
    pub email: String,
    pub birth_date: NaiveDate,
    pub skill_level: String,
    pub gender: String,
    pub registered_at: DateTime<Utc>,
}

/// Fields required to create a player.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub full_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub skill_level: String,
    pub gender: String,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub skill_level: Option<String>,
    pub gender: Option<String>,
}

impl Player {
    pub fn new(new: NewPlayer) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: new.full_name.trim().to_string(),
            email: new.email.trim().to_string(),
            birth_date: new.birth_date,
            skill_level: new.skill_level,
            gender: new.gender,
            registered_at: Utc::now(),
        }
    }

    /// Apply an update. Returns true if any field changed.
    pub fn apply(&mut self, update: PlayerUpdate) -> bool {
        let before = self.clone();
        if let Some(name) = update.full_name {
            self.full_name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            self.email = email.trim().to_string();
        }
        if let Some(date) = update.birth_date {
            self.birth_date = date;
        }
        if let Some(level) = update.skill_level {
            self.skill_level = level;
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
        *self != before
    }

    /// How this player appears in a bracket slot.
    pub fn to_ref(&self) -> PlayerRef {
        PlayerRef::new(self.id.to_string(), self.full_name.clone())
    }
}
