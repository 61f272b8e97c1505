//! Registrations: entering players into tournament categories and tracking payment.

use crate::models::{
    CategoryEntry, NewRegistration, PaymentStatus, PlayerId, Registration, RegistrationId,
    RegistrationUpdate, TournamentError, TournamentId,
};
use crate::store::Stores;

/// Category entry (name and fee) as currently listed by the tournament.
fn category_entry(
    stores: &Stores,
    tournament_id: TournamentId,
    category_name: &str,
) -> Result<CategoryEntry, TournamentError> {
    let tournament = stores
        .tournaments
        .get(tournament_id)?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))?;
    let category = tournament
        .category(category_name)
        .ok_or_else(|| TournamentError::CategoryNotFound(category_name.to_string()))?;
    Ok(CategoryEntry {
        name: category.name.clone(),
        entry_fee: category.entry_fee,
    })
}

fn already_registered(registration: &Registration, all: &[Registration]) -> bool {
    all.iter().any(|r| {
        r.id != registration.id
            && r.player_id == registration.player_id
            && r.is_for(registration.tournament_id, &registration.category.name)
    })
}

/// Register a player in a category. The fee is taken from the tournament's category list.
pub fn create_registration(
    stores: &Stores,
    new: NewRegistration,
) -> Result<Registration, TournamentError> {
    let category = category_entry(stores, new.tournament_id, new.category_name.trim())?;
    if stores.players.get(new.player_id)?.is_none() {
        return Err(TournamentError::PlayerNotFound(new.player_id));
    }
    let registration = Registration::new(
        new.tournament_id,
        new.player_id,
        category,
        new.payment_status,
    );
    stores.registrations.insert_checked(registration, |r, all| {
        if already_registered(r, all) {
            return Err(TournamentError::DuplicateRegistration);
        }
        Ok(())
    })
}

pub fn list_registrations(stores: &Stores) -> Result<Vec<Registration>, TournamentError> {
    Ok(stores.registrations.all()?)
}

pub fn registrations_for_tournament(
    stores: &Stores,
    tournament_id: TournamentId,
) -> Result<Vec<Registration>, TournamentError> {
    Ok(stores
        .registrations
        .find(|r| r.tournament_id == tournament_id)?)
}

pub fn registrations_for_player(
    stores: &Stores,
    player_id: PlayerId,
) -> Result<Vec<Registration>, TournamentError> {
    Ok(stores.registrations.find(|r| r.player_id == player_id)?)
}

pub fn get_registration(
    stores: &Stores,
    id: RegistrationId,
) -> Result<Registration, TournamentError> {
    stores
        .registrations
        .get(id)?
        .ok_or(TournamentError::RegistrationNotFound(id))
}

/// Move a registration to another category and/or change its payment status.
pub fn update_registration(
    stores: &Stores,
    id: RegistrationId,
    update: RegistrationUpdate,
) -> Result<(Registration, bool), TournamentError> {
    let current = get_registration(stores, id)?;
    let category = match update.category_name.as_deref().map(str::trim) {
        Some(name) if name != current.category.name => {
            Some(category_entry(stores, current.tournament_id, name)?)
        }
        _ => None,
    };
    stores
        .registrations
        .modify(id, |registration, all| {
            let mut changed = false;
            if let Some(category) = category {
                registration.category = category;
                // The old charge was for the old fee.
                registration.pix = None;
                changed = true;
            }
            if let Some(status) = update.payment_status {
                changed |= registration.payment_status != status;
                registration.payment_status = status;
            }
            if already_registered(registration, all) {
                return Err(TournamentError::DuplicateRegistration);
            }
            Ok(changed)
        })?
        .ok_or(TournamentError::RegistrationNotFound(id))
}

/// Manually set the payment status (e.g. after checking the bank statement).
pub fn set_payment_status(
    stores: &Stores,
    id: RegistrationId,
    status: PaymentStatus,
) -> Result<(Registration, bool), TournamentError> {
    let result = update_registration(
        stores,
        id,
        RegistrationUpdate {
            category_name: None,
            payment_status: Some(status),
        },
    )?;
    if result.1 {
        log::info!("Registration {} payment status set to {:?}", id, status);
    }
    Ok(result)
}

pub fn delete_registration(stores: &Stores, id: RegistrationId) -> Result<(), TournamentError> {
    stores
        .registrations
        .remove(id)?
        .ok_or(TournamentError::RegistrationNotFound(id))?;
    Ok(())
}
