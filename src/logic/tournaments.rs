//! Tournament catalogue: validated creation and updates, cascading deletes.

use crate::models::{
    CategoryKey, NewTournament, Tournament, TournamentError, TournamentId, TournamentUpdate,
};
use crate::store::Stores;

pub fn create_tournament(stores: &Stores, new: NewTournament) -> Result<Tournament, TournamentError> {
    let tournament = Tournament::new(new);
    tournament.validate()?;
    Ok(stores.tournaments.insert(tournament)?)
}

pub fn list_tournaments(stores: &Stores) -> Result<Vec<Tournament>, TournamentError> {
    Ok(stores.tournaments.all()?)
}

pub fn get_tournament(stores: &Stores, id: TournamentId) -> Result<Tournament, TournamentError> {
    stores
        .tournaments
        .get(id)?
        .ok_or(TournamentError::TournamentNotFound(id))
}

/// Fails with `CategoryInUse` if `name` still has registrations or matches.
fn ensure_category_unused(
    stores: &Stores,
    id: TournamentId,
    name: &str,
) -> Result<(), TournamentError> {
    let registered = stores.registrations.find_one(|r| r.is_for(id, name))?.is_some();
    let drawn = !stores
        .matches
        .query_for_category(&CategoryKey::new(id, name))?
        .is_empty();
    if registered || drawn {
        return Err(TournamentError::CategoryInUse(name.to_string()));
    }
    Ok(())
}

/// Apply `update`, re-validating categories and dates; the flag tells whether anything changed.
///
/// A category can only be renamed or dropped while nobody is registered in it.
pub fn update_tournament(
    stores: &Stores,
    id: TournamentId,
    update: TournamentUpdate,
) -> Result<(Tournament, bool), TournamentError> {
    stores
        .tournaments
        .modify(id, |tournament, _| {
            let before: Vec<String> = tournament.categories.iter().map(|c| c.name.clone()).collect();
            let changed = tournament.apply(update);
            tournament.validate()?;
            for name in before.iter().filter(|name| tournament.category(name).is_none()) {
                ensure_category_unused(stores, id, name)?;
            }
            Ok::<_, TournamentError>(changed)
        })?
        .ok_or(TournamentError::TournamentNotFound(id))
}

/// Delete a tournament together with its registrations and matches.
pub fn delete_tournament(stores: &Stores, id: TournamentId) -> Result<(), TournamentError> {
    stores
        .tournaments
        .remove(id)?
        .ok_or(TournamentError::TournamentNotFound(id))?;
    let registrations = stores.registrations.remove_where(|r| r.tournament_id == id)?;
    let matches = stores.matches.delete_all_for_tournament(id)?;
    log::info!(
        "Deleted tournament {} with {} registration(s) and {} match(es)",
        id,
        registrations,
        matches
    );
    Ok(())
}
