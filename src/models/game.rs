//! Match records, player slots and match status for single-elimination brackets.

use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stored match.
pub type MatchId = Uuid;

/// Id and name of the sentinel that fills empty bracket slots.
pub const BYE: &str = "BYE";

/// A player as it appears in a bracket slot: opaque id plus display name.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: String,
    pub name: String,
}

impl PlayerRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The "BYE" sentinel.
    pub fn bye() -> Self {
        Self::new(BYE, BYE)
    }

    pub fn is_bye(&self) -> bool {
        self.id == BYE
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Finished,
}

/// Identifies the bracket of one category inside one tournament.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryKey {
    pub tournament_id: TournamentId,
    pub category_name: String,
}

impl CategoryKey {
    pub fn new(tournament_id: TournamentId, category_name: impl Into<String>) -> Self {
        Self {
            tournament_id,
            category_name: category_name.into(),
        }
    }
}

/// A single bracket match between two slots. Either slot may be a bye.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMatch {
    pub tournament_id: TournamentId,
    pub category_name: String,
    /// Human-readable round tag, e.g. "First Round (8 participants)".
    pub round: String,
    /// 1 for the first round; ordering uses this, never `round`.
    pub round_index: u32,
    /// 1-based position within the round.
    pub match_number: u32,
    pub player_1: PlayerRef,
    pub player_2: PlayerRef,
    /// None until the match is decided.
    pub winner_id: Option<String>,
    pub score: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub court: Option<String>,
    pub status: MatchStatus,
}

impl GameMatch {
    /// Build a match for the given slots. A pairing against a bye is resolved on the spot.
    pub fn new(
        key: &CategoryKey,
        round: impl Into<String>,
        round_index: u32,
        match_number: u32,
        player_1: PlayerRef,
        player_2: PlayerRef,
    ) -> Self {
        let mut game = Self {
            tournament_id: key.tournament_id,
            category_name: key.category_name.clone(),
            round: round.into(),
            round_index,
            match_number,
            player_1,
            player_2,
            winner_id: None,
            score: None,
            scheduled_time: None,
            court: None,
            status: MatchStatus::Scheduled,
        };
        if let Some(winner) = game.walkover_winner() {
            game.winner_id = Some(winner);
            game.score = Some(BYE.to_string());
            game.status = MatchStatus::Finished;
        }
        game
    }

    /// Id of the real player when the opponent is a bye.
    fn walkover_winner(&self) -> Option<String> {
        match (self.player_1.is_bye(), self.player_2.is_bye()) {
            (false, true) => Some(self.player_1.id.clone()),
            (true, false) => Some(self.player_2.id.clone()),
            _ => None,
        }
    }

    pub fn has_bye(&self) -> bool {
        self.player_1.is_bye() || self.player_2.is_bye()
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn key(&self) -> CategoryKey {
        CategoryKey::new(self.tournament_id, self.category_name.clone())
    }

    /// The slot whose id equals `winner_id`.
    pub fn winner(&self) -> Option<&PlayerRef> {
        let id = self.winner_id.as_deref()?;
        [&self.player_1, &self.player_2]
            .into_iter()
            .find(|p| p.id == id)
    }
}

/// A match as persisted by a [`MatchStore`](crate::store::MatchStore): the match plus its store id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    #[serde(flatten)]
    pub game: GameMatch,
}

impl MatchRecord {
    pub fn new(game: GameMatch) -> Self {
        Self {
            id: Uuid::new_v4(),
            game,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> CategoryKey {
        CategoryKey::new(Uuid::new_v4(), "Mixed B")
    }

    #[test]
    fn bye_in_either_slot_finishes_the_match() {
        let a = PlayerRef::new("a", "Ana");
        let left = GameMatch::new(&key(), "First Round (4 participants)", 1, 1, PlayerRef::bye(), a.clone());
        let right = GameMatch::new(&key(), "First Round (4 participants)", 1, 2, a.clone(), PlayerRef::bye());
        for m in [left, right] {
            assert_eq!(m.status, MatchStatus::Finished);
            assert_eq!(m.winner_id.as_deref(), Some("a"));
            assert_eq!(m.score.as_deref(), Some(BYE));
            assert_eq!(m.winner(), Some(&a));
        }
    }

    #[test]
    fn two_real_players_are_scheduled() {
        let m = GameMatch::new(
            &key(),
            "Final (2 participants)",
            1,
            1,
            PlayerRef::new("a", "Ana"),
            PlayerRef::new("b", "Bia"),
        );
        assert_eq!(m.status, MatchStatus::Scheduled);
        assert!(m.winner_id.is_none());
        assert!(m.score.is_none());
        assert!(!m.has_bye());
    }

    #[test]
    fn record_serializes_flat_in_camel_case() {
        let m = GameMatch::new(&key(), "R", 1, 1, PlayerRef::new("a", "Ana"), PlayerRef::bye());
        let value = serde_json::to_value(MatchRecord::new(m)).unwrap();
        assert!(value.get("id").is_some());
        assert_eq!(value["matchNumber"], 1);
        assert_eq!(value["player1"]["id"], "a");
        assert_eq!(value["status"], "finished");
    }
}
