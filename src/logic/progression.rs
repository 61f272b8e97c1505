//! Bracket progression: results, scheduling, and building later rounds from winners.

use crate::logic::draw::round_label;
use crate::models::{
    CategoryKey, GameMatch, MatchId, MatchRecord, MatchStatus, PlayerRef, TournamentError,
    TournamentId, BYE,
};
use crate::store::{MatchStore, StoreError, Stores};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the transport layer reports after a new round was created.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub message: String,
    pub round: String,
    pub round_index: u32,
    pub matches_count: usize,
    pub match_ids: Vec<MatchId>,
}

/// All matches of a category, ordered by round then match number.
pub fn category_matches(
    stores: &Stores,
    tournament_id: TournamentId,
    category_name: &str,
) -> Result<Vec<MatchRecord>, TournamentError> {
    let key = CategoryKey::new(tournament_id, category_name);
    Ok(stores.matches.query_for_category(&key)?)
}

fn scheduled_match(matches: &dyn MatchStore, match_id: MatchId) -> Result<MatchRecord, TournamentError> {
    let record = matches
        .get(match_id)?
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if record.game.is_finished() {
        return Err(TournamentError::MatchAlreadyFinished(match_id));
    }
    Ok(record)
}

fn write_scheduled(
    matches: &dyn MatchStore,
    match_id: MatchId,
    change: &mut dyn FnMut(&mut GameMatch),
) -> Result<MatchRecord, TournamentError> {
    matches
        .update_scheduled(match_id, change)
        .map_err(|e| match e {
            StoreError::Finished(id) => TournamentError::MatchAlreadyFinished(id),
            StoreError::NotFound(id) => TournamentError::MatchNotFound(id),
            other => other.into(),
        })
}

/// Record the winner (and optional score) of a scheduled match.
pub fn record_result(
    matches: &dyn MatchStore,
    match_id: MatchId,
    winner_id: &str,
    score: Option<String>,
) -> Result<MatchRecord, TournamentError> {
    let record = scheduled_match(matches, match_id)?;
    let game = &record.game;
    if winner_id == BYE || (game.player_1.id != winner_id && game.player_2.id != winner_id) {
        return Err(TournamentError::WinnerNotInMatch);
    }
    let score = score.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    write_scheduled(matches, match_id, &mut |game: &mut GameMatch| {
        game.winner_id = Some(winner_id.to_string());
        game.score = score.clone();
        game.status = MatchStatus::Finished;
    })
}

/// Set when and where a scheduled match is played. `None` clears the field.
pub fn schedule_match(
    matches: &dyn MatchStore,
    match_id: MatchId,
    scheduled_time: Option<DateTime<Utc>>,
    court: Option<String>,
) -> Result<MatchRecord, TournamentError> {
    write_scheduled(matches, match_id, &mut |game: &mut GameMatch| {
        game.scheduled_time = scheduled_time;
        game.court = court.clone();
    })
}

/// Pair the winners of the category's latest round into the next round.
///
/// Winners of matches 1 and 2 meet in match 1, winners of 3 and 4 in match 2, and so on.
pub fn advance_round(
    stores: &Stores,
    tournament_id: TournamentId,
    category_name: &str,
) -> Result<RoundSummary, TournamentError> {
    let tournament = stores
        .tournaments
        .get(tournament_id)?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))?;
    if tournament.category(category_name).is_none() {
        return Err(TournamentError::CategoryNotFound(category_name.to_string()));
    }

    let key = CategoryKey::new(tournament_id, category_name);
    let all = stores.matches.query_for_category(&key)?;
    let last_round = all
        .iter()
        .map(|m| m.game.round_index)
        .max()
        .ok_or(TournamentError::NoDraw)?;
    let current: Vec<&GameMatch> = all
        .iter()
        .map(|m| &m.game)
        .filter(|m| m.round_index == last_round)
        .collect();

    let winners: Vec<PlayerRef> = current
        .iter()
        .map(|m| m.winner().filter(|_| m.is_finished()).cloned())
        .collect::<Option<_>>()
        .ok_or(TournamentError::RoundIncomplete { round: last_round })?;
    if winners.len() < 2 {
        return Err(TournamentError::BracketComplete);
    }

    let round_index = last_round + 1;
    let round = round_label(round_index, winners.len());
    let next: Vec<GameMatch> = winners
        .chunks_exact(2)
        .zip(1..)
        .map(|(pair, match_number)| {
            GameMatch::new(
                &key,
                round.clone(),
                round_index,
                match_number,
                pair[0].clone(),
                pair[1].clone(),
            )
        })
        .collect();

    let records = stores.matches.append_round(&key, round_index, next)?;
    log::info!(
        "Category '{}' of tournament {} advanced to {}",
        category_name,
        tournament_id,
        round
    );

    Ok(RoundSummary {
        message: format!("{round} created for category '{category_name}'."),
        round,
        round_index,
        matches_count: records.len(),
        match_ids: records.iter().map(|r| r.id).collect(),
    })
}

/// Winner of the final, once it has been played.
pub fn champion(
    stores: &Stores,
    tournament_id: TournamentId,
    category_name: &str,
) -> Result<Option<PlayerRef>, TournamentError> {
    let all = category_matches(stores, tournament_id, category_name)?;
    let Some(last_round) = all.iter().map(|m| m.game.round_index).max() else {
        return Ok(None);
    };
    let mut last = all.iter().filter(|m| m.game.round_index == last_round);
    match (last.next(), last.next()) {
        (Some(final_match), None) if final_match.game.is_finished() => {
            Ok(final_match.game.winner().cloned())
        }
        _ => Ok(None),
    }
}
