//! Player registry: creation with unique emails, updates, and cascading deletes.

use crate::models::{NewPlayer, Player, PlayerId, PlayerUpdate, TournamentError};
use crate::store::Stores;

fn validate(player: &Player) -> Result<(), TournamentError> {
    if player.full_name.is_empty() {
        return Err(TournamentError::Validation("Field 'fullName' is required".into()));
    }
    if !player.email.contains('@') {
        return Err(TournamentError::Validation("Field 'email' must be an email address".into()));
    }
    Ok(())
}

fn email_taken(player: &Player, others: &[Player]) -> bool {
    others
        .iter()
        .any(|p| p.id != player.id && p.email.eq_ignore_ascii_case(&player.email))
}

pub fn create_player(stores: &Stores, new: NewPlayer) -> Result<Player, TournamentError> {
    let player = Player::new(new);
    validate(&player)?;
    stores.players.insert_checked(player, |p, all| {
        if email_taken(p, all) {
            return Err(TournamentError::DuplicateEmail);
        }
        Ok(())
    })
}

/// All players, or only the one with `email` (case-insensitive) when given.
pub fn list_players(stores: &Stores, email: Option<&str>) -> Result<Vec<Player>, TournamentError> {
    let players = match email.map(str::trim) {
        Some(email) => stores
            .players
            .find(|p| p.email.eq_ignore_ascii_case(email))?,
        None => stores.players.all()?,
    };
    Ok(players)
}

pub fn get_player(stores: &Stores, id: PlayerId) -> Result<Player, TournamentError> {
    stores
        .players
        .get(id)?
        .ok_or(TournamentError::PlayerNotFound(id))
}

/// Apply `update`; the flag tells whether anything changed.
pub fn update_player(
    stores: &Stores,
    id: PlayerId,
    update: PlayerUpdate,
) -> Result<(Player, bool), TournamentError> {
    stores
        .players
        .modify(id, |player, all| {
            let changed = player.apply(update);
            validate(player)?;
            if email_taken(player, all) {
                return Err(TournamentError::DuplicateEmail);
            }
            Ok(changed)
        })?
        .ok_or(TournamentError::PlayerNotFound(id))
}

/// Delete a player and every registration they hold. Returns the number of registrations removed.
pub fn delete_player(stores: &Stores, id: PlayerId) -> Result<usize, TournamentError> {
    stores
        .players
        .remove(id)?
        .ok_or(TournamentError::PlayerNotFound(id))?;
    let removed = stores.registrations.remove_where(|r| r.player_id == id)?;
    log::info!("Deleted player {} and {} registration(s)", id, removed);
    Ok(removed)
}
