//! Single-elimination draw: random seeding, byes, and first-round pairing.

use crate::models::{
    CategoryKey, GameMatch, MatchId, PlayerRef, TournamentError, TournamentId,
};
use crate::store::Stores;
use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;

/// Outcome of the pure draw algorithm, before anything is stored.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawResult {
    pub total_players: usize,
    pub byes_assigned: usize,
    pub draw_size: usize,
    pub matches: Vec<GameMatch>,
}

/// What the transport layer reports after a draw was generated and stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawSummary {
    pub message: String,
    pub total_players: usize,
    pub byes_assigned: usize,
    pub draw_size: usize,
    pub first_round_matches_count: usize,
    pub first_round_match_ids: Vec<MatchId>,
}

/// Smallest power of two that holds `players` slots.
pub fn draw_size_for(players: usize) -> usize {
    players.next_power_of_two()
}

/// Round tag shown to players, e.g. "Semifinals (4 participants)".
pub fn round_label(round_index: u32, participants: usize) -> String {
    let name = match (round_index, participants) {
        (1, _) => "First Round".to_string(),
        (_, 2) => "Final".to_string(),
        (_, 4) => "Semifinals".to_string(),
        (_, 8) => "Quarterfinals".to_string(),
        (k, _) => format!("Round {k}"),
    };
    format!("{name} ({participants} participants)")
}

/// Build the first round for `confirmed` players.
///
/// 1. Shuffle the players.
/// 2. Size the bracket to the next power of two; the empty slots become byes.
/// 3. Pick a random set of pairs to hold one bye each, so no pair is two byes.
/// 4. Fill the pairs in shuffled order, with a random side for each slot.
///    A pairing against a bye is finished at once.
///
/// Fails with `NoConfirmedPlayers` for an empty list and `InsufficientPlayers` for one player.
pub fn generate_draw<R: Rng + ?Sized>(
    key: &CategoryKey,
    confirmed: Vec<PlayerRef>,
    rng: &mut R,
) -> Result<DrawResult, TournamentError> {
    let total_players = confirmed.len();
    match total_players {
        0 => return Err(TournamentError::NoConfirmedPlayers),
        1 => return Err(TournamentError::InsufficientPlayers),
        _ => {}
    }

    let mut players = confirmed;
    players.shuffle(rng);

    let draw_size = draw_size_for(total_players);
    let byes_assigned = draw_size - total_players;
    let pair_count = draw_size / 2;
    // byes_assigned < pair_count since draw_size / 2 < total_players, so every bye meets a player.
    let bye_pairs: HashSet<usize> = index::sample(rng, pair_count, byes_assigned)
        .into_iter()
        .collect();

    let round = round_label(1, draw_size);
    let mut players = players.into_iter();
    let mut matches = Vec::with_capacity(pair_count);
    for (pair, match_number) in (0..pair_count).zip(1..) {
        let first = players.next().ok_or(TournamentError::InsufficientPlayers)?;
        let second = if bye_pairs.contains(&pair) {
            PlayerRef::bye()
        } else {
            players.next().ok_or(TournamentError::InsufficientPlayers)?
        };
        let (player_1, player_2) = if rng.gen_bool(0.5) {
            (first, second)
        } else {
            (second, first)
        };
        matches.push(GameMatch::new(key, round.clone(), 1, match_number, player_1, player_2));
    }

    Ok(DrawResult {
        total_players,
        byes_assigned,
        draw_size,
        matches,
    })
}

/// Confirmed entrants of a category, resolved to bracket slots.
///
/// Registrations whose player record no longer exists are skipped.
pub fn confirmed_players(
    stores: &Stores,
    tournament_id: TournamentId,
    category_name: &str,
) -> Result<Vec<PlayerRef>, TournamentError> {
    let registrations = stores
        .registrations
        .find(|r| r.is_for(tournament_id, category_name) && r.is_confirmed())?;
    let mut players = Vec::with_capacity(registrations.len());
    for registration in registrations {
        match stores.players.get(registration.player_id)? {
            Some(player) => players.push(player.to_ref()),
            None => log::warn!(
                "Registration {} points at missing player {}; left out of the draw",
                registration.id,
                registration.player_id
            ),
        }
    }
    Ok(players)
}

/// Generate and store the draw for one category, replacing any previous draw.
///
/// Nothing is deleted when the draw cannot be formed. Results recorded on a
/// previous draw of the category are discarded.
pub fn generate_category_draw<R: Rng + ?Sized>(
    stores: &Stores,
    tournament_id: TournamentId,
    category_name: &str,
    rng: &mut R,
) -> Result<DrawSummary, TournamentError> {
    let tournament = stores
        .tournaments
        .get(tournament_id)?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))?;
    if tournament.category(category_name).is_none() {
        return Err(TournamentError::CategoryNotFound(category_name.to_string()));
    }

    let key = CategoryKey::new(tournament_id, category_name);
    let players = confirmed_players(stores, tournament_id, category_name)?;
    let draw = generate_draw(&key, players, rng)?;

    let records = stores.matches.replace_for_category(&key, draw.matches)?;
    log::info!(
        "Draw for '{}' in tournament {}: {} players, {} byes, size {}",
        category_name,
        tournament_id,
        draw.total_players,
        draw.byes_assigned,
        draw.draw_size
    );

    Ok(DrawSummary {
        message: format!(
            "Single-elimination draw generated for category '{category_name}'."
        ),
        total_players: draw.total_players,
        byes_assigned: draw.byes_assigned,
        draw_size: draw.draw_size,
        first_round_matches_count: records.len(),
        first_round_match_ids: records.iter().map(|r| r.id).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchStatus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn players(n: usize) -> Vec<PlayerRef> {
        (0..n).map(|i| PlayerRef::new(format!("p{i}"), format!("Player {i}"))).collect()
    }

    fn key() -> CategoryKey {
        CategoryKey::new(Uuid::new_v4(), "Open A")
    }

    #[test]
    fn draw_sizes() {
        assert_eq!(draw_size_for(2), 2);
        assert_eq!(draw_size_for(3), 4);
        assert_eq!(draw_size_for(8), 8);
        assert_eq!(draw_size_for(9), 16);
    }

    #[test]
    fn round_labels() {
        assert_eq!(round_label(1, 8), "First Round (8 participants)");
        assert_eq!(round_label(1, 2), "First Round (2 participants)");
        assert_eq!(round_label(2, 8), "Quarterfinals (8 participants)");
        assert_eq!(round_label(3, 4), "Semifinals (4 participants)");
        assert_eq!(round_label(4, 2), "Final (2 participants)");
        assert_eq!(round_label(2, 16), "Round 2 (16 participants)");
    }

    #[test]
    fn four_players_no_byes() {
        let mut rng = StdRng::seed_from_u64(7);
        let draw = generate_draw(&key(), players(4), &mut rng).unwrap();
        assert_eq!(draw.draw_size, 4);
        assert_eq!(draw.byes_assigned, 0);
        assert_eq!(draw.matches.len(), 2);
        assert!(draw.matches.iter().all(|m| m.status == MatchStatus::Scheduled));
        let numbers: Vec<_> = draw.matches.iter().map(|m| m.match_number).collect();
        assert_eq!(numbers, [1, 2]);
    }

    #[test]
    fn every_bye_meets_a_player() {
        let mut rng = StdRng::seed_from_u64(0);
        for n in 2..=70 {
            let draw = generate_draw(&key(), players(n), &mut rng).unwrap();
            let finished = draw.matches.iter().filter(|m| m.is_finished()).count();
            assert_eq!(finished, draw.byes_assigned, "n = {n}");
            assert!(draw
                .matches
                .iter()
                .all(|m| !(m.player_1.is_bye() && m.player_2.is_bye())));
        }
    }

    #[test]
    fn five_players_three_byes() {
        let mut rng = StdRng::seed_from_u64(11);
        let draw = generate_draw(&key(), players(5), &mut rng).unwrap();
        assert_eq!(draw.total_players, 5);
        assert_eq!(draw.draw_size, 8);
        assert_eq!(draw.byes_assigned, 3);
        assert_eq!(draw.matches.len(), 4);
        let finished = draw.matches.iter().filter(|m| m.is_finished()).count();
        assert_eq!(finished, 3);
        assert!(draw
            .matches
            .iter()
            .all(|m| m.round == "First Round (8 participants)" && m.round_index == 1));
    }

    #[test]
    fn empty_and_single_player_fail() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generate_draw(&key(), Vec::new(), &mut rng),
            Err(TournamentError::NoConfirmedPlayers)
        ));
        assert!(matches!(
            generate_draw(&key(), players(1), &mut rng),
            Err(TournamentError::InsufficientPlayers)
        ));
    }

    #[test]
    fn same_seed_same_draw() {
        let k = key();
        let a = generate_draw(&k, players(11), &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate_draw(&k, players(11), &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn byes_are_not_always_at_the_end() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut bye_positions = std::collections::HashSet::new();
        for _ in 0..64 {
            let draw = generate_draw(&key(), players(3), &mut rng).unwrap();
            let slots: Vec<_> = draw
                .matches
                .iter()
                .flat_map(|m| [&m.player_1, &m.player_2])
                .collect();
            let pos = slots.iter().position(|p| p.is_bye()).unwrap();
            bye_positions.insert(pos);
        }
        assert!(bye_positions.len() > 1);
    }
}
