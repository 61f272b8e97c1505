//! Registrations of players into tournament categories, with payment status.

use crate::models::player::PlayerId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type RegistrationId = Uuid;

/// Payment state of a registration. Only `Confirmed` registrations enter the draw.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

/// Snapshot of the category at registration time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntry {
    pub name: String,
    pub entry_fee: f64,
}

/// Simulated PIX charge attached to a registration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixDetails {
    /// BR Code text ("copia e cola").
    pub copy_paste: String,
    /// Rendered code image, base64-encoded.
    pub qr_code_base64: String,
    pub amount: f64,
    pub receiver_key: String,
    pub receiver_name: String,
    pub receiver_city: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: RegistrationId,
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    pub category: CategoryEntry,
    pub registered_at: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub pix: Option<PixDetails>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistration {
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    pub category_name: String,
    #[serde(default)]
    pub payment_status: PaymentStatus,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationUpdate {
    pub category_name: Option<String>,
    pub payment_status: Option<PaymentStatus>,
}

impl Registration {
    pub fn new(
        tournament_id: TournamentId,
        player_id: PlayerId,
        category: CategoryEntry,
        payment_status: PaymentStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            player_id,
            category,
            registered_at: Utc::now(),
            payment_status,
            pix: None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.payment_status == PaymentStatus::Confirmed
    }

    /// True if this registration is for `category` of `tournament_id`.
    pub fn is_for(&self, tournament_id: TournamentId, category: &str) -> bool {
        self.tournament_id == tournament_id && self.category.name == category
    }
}
