//! Match store: persistent collection of match records keyed by category.

use crate::models::{CategoryKey, GameMatch, MatchId, MatchRecord, TournamentId};
use crate::store::StoreError;
use std::collections::HashMap;
use std::sync::RwLock;

/// Contract for match persistence. Implementations assign record ids.
pub trait MatchStore: Send + Sync {
    /// Remove every match of the category. Returns how many were removed (0 is fine).
    fn delete_all_for_category(&self, key: &CategoryKey) -> Result<usize, StoreError>;

    /// Store new matches, each under a fresh id.
    fn insert_many(&self, matches: Vec<GameMatch>) -> Result<Vec<MatchRecord>, StoreError>;

    /// All matches of the category ordered by round index, then match number.
    fn query_for_category(&self, key: &CategoryKey) -> Result<Vec<MatchRecord>, StoreError>;

    /// Delete the category's matches and insert `matches` as one atomic step.
    fn replace_for_category(
        &self,
        key: &CategoryKey,
        matches: Vec<GameMatch>,
    ) -> Result<Vec<MatchRecord>, StoreError>;

    /// Insert the matches of round `round_index`, failing if the category already
    /// has any match in that round or a later one.
    fn append_round(
        &self,
        key: &CategoryKey,
        round_index: u32,
        matches: Vec<GameMatch>,
    ) -> Result<Vec<MatchRecord>, StoreError>;

    fn get(&self, id: MatchId) -> Result<Option<MatchRecord>, StoreError>;

    /// Overwrite a stored record. `NotFound` if its id is unknown.
    fn update(&self, record: MatchRecord) -> Result<(), StoreError>;

    /// Apply `change` to a match that is still scheduled, checking and writing under
    /// one lock. `Finished` if the match already has a result.
    fn update_scheduled(
        &self,
        id: MatchId,
        change: &mut dyn FnMut(&mut GameMatch),
    ) -> Result<MatchRecord, StoreError>;

    fn delete_all_for_tournament(&self, tournament_id: TournamentId) -> Result<usize, StoreError>;
}

#[derive(Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<HashMap<MatchId, MatchRecord>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn belongs_to(record: &MatchRecord, key: &CategoryKey) -> bool {
    record.game.tournament_id == key.tournament_id && record.game.category_name == key.category_name
}

fn insert_all(
    map: &mut HashMap<MatchId, MatchRecord>,
    matches: Vec<GameMatch>,
) -> Vec<MatchRecord> {
    matches
        .into_iter()
        .map(|game| {
            let record = MatchRecord::new(game);
            map.insert(record.id, record.clone());
            record
        })
        .collect()
}

impl MatchStore for InMemoryMatchStore {
    fn delete_all_for_category(&self, key: &CategoryKey) -> Result<usize, StoreError> {
        let mut g = self.matches.write().map_err(|_| StoreError::Poisoned)?;
        let before = g.len();
        g.retain(|_, m| !belongs_to(m, key));
        Ok(before - g.len())
    }

    fn insert_many(&self, matches: Vec<GameMatch>) -> Result<Vec<MatchRecord>, StoreError> {
        let mut g = self.matches.write().map_err(|_| StoreError::Poisoned)?;
        Ok(insert_all(&mut g, matches))
    }

    fn query_for_category(&self, key: &CategoryKey) -> Result<Vec<MatchRecord>, StoreError> {
        let g = self.matches.read().map_err(|_| StoreError::Poisoned)?;
        let mut found: Vec<MatchRecord> = g.values().filter(|m| belongs_to(m, key)).cloned().collect();
        found.sort_by_key(|m| (m.game.round_index, m.game.match_number));
        Ok(found)
    }

    fn replace_for_category(
        &self,
        key: &CategoryKey,
        matches: Vec<GameMatch>,
    ) -> Result<Vec<MatchRecord>, StoreError> {
        let mut g = self.matches.write().map_err(|_| StoreError::Poisoned)?;
        g.retain(|_, m| !belongs_to(m, key));
        Ok(insert_all(&mut g, matches))
    }

    fn append_round(
        &self,
        key: &CategoryKey,
        round_index: u32,
        matches: Vec<GameMatch>,
    ) -> Result<Vec<MatchRecord>, StoreError> {
        let mut g = self.matches.write().map_err(|_| StoreError::Poisoned)?;
        if g
            .values()
            .any(|m| belongs_to(m, key) && m.game.round_index >= round_index)
        {
            return Err(StoreError::RoundConflict { round: round_index });
        }
        Ok(insert_all(&mut g, matches))
    }

    fn get(&self, id: MatchId) -> Result<Option<MatchRecord>, StoreError> {
        let g = self.matches.read().map_err(|_| StoreError::Poisoned)?;
        Ok(g.get(&id).cloned())
    }

    fn update(&self, record: MatchRecord) -> Result<(), StoreError> {
        let mut g = self.matches.write().map_err(|_| StoreError::Poisoned)?;
        match g.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(StoreError::NotFound(record.id)),
        }
    }

    fn update_scheduled(
        &self,
        id: MatchId,
        change: &mut dyn FnMut(&mut GameMatch),
    ) -> Result<MatchRecord, StoreError> {
        let mut g = self.matches.write().map_err(|_| StoreError::Poisoned)?;
        let record = g.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if record.game.is_finished() {
            return Err(StoreError::Finished(id));
        }
        change(&mut record.game);
        Ok(record.clone())
    }

    fn delete_all_for_tournament(&self, tournament_id: TournamentId) -> Result<usize, StoreError> {
        let mut g = self.matches.write().map_err(|_| StoreError::Poisoned)?;
        let before = g.len();
        g.retain(|_, m| m.game.tournament_id != tournament_id);
        Ok(before - g.len())
    }
}
