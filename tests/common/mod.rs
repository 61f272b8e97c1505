//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use beach_tournament_web::logic::{create_player, create_registration, create_tournament};
use beach_tournament_web::models::{
    Category, NewPlayer, NewRegistration, NewTournament, PaymentStatus, Player, Tournament,
    TournamentStatus,
};
use beach_tournament_web::Stores;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_PLAYER: AtomicUsize = AtomicUsize::new(0);

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn new_tournament(categories: &[&str]) -> NewTournament {
    NewTournament {
        name: "Santos Open".into(),
        location: "Praia do Gonzaga".into(),
        start_date: date(2026, 11, 7),
        end_date: date(2026, 11, 8),
        registration_deadline: date(2026, 11, 1),
        categories: categories
            .iter()
            .map(|name| Category {
                name: name.to_string(),
                entry_fee: 120.0,
                slots: 32,
            })
            .collect(),
        status: TournamentStatus::RegistrationOpen,
    }
}

pub fn tournament(stores: &Stores, categories: &[&str]) -> Tournament {
    create_tournament(stores, new_tournament(categories)).unwrap()
}

pub fn new_player(name: &str) -> NewPlayer {
    NewPlayer {
        full_name: name.into(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        birth_date: date(1994, 3, 15),
        skill_level: "B".into(),
        gender: "F".into(),
    }
}

pub fn player(stores: &Stores, name: &str) -> Player {
    create_player(stores, new_player(name)).unwrap()
}

/// `n` players registered in `category` with the given payment status.
pub fn entrants(
    stores: &Stores,
    tournament: &Tournament,
    category: &str,
    n: usize,
    status: PaymentStatus,
) -> Vec<Player> {
    (0..n)
        .map(|_| {
            let i = NEXT_PLAYER.fetch_add(1, Ordering::Relaxed);
            let p = player(stores, &format!("{category} {status:?} {i}"));
            create_registration(
                stores,
                NewRegistration {
                    tournament_id: tournament.id,
                    player_id: p.id,
                    category_name: category.to_string(),
                    payment_status: status,
                },
            )
            .unwrap();
            p
        })
        .collect()
}
