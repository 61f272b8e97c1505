//! REST API: thin actix-web handlers that map requests to the logic functions.
//!
//! Register everything with [`configure`]; handlers expect `Data<AppState>` in app data.

use crate::config::Config;
use crate::logic::{self, PaymentSimulator, SvgQrRenderer};
use crate::models::{
    MatchId, NewPlayer, NewRegistration, NewTournament, PaymentStatus, PlayerId, PlayerUpdate,
    RegistrationId, RegistrationUpdate, TournamentError, TournamentId, TournamentUpdate,
};
use crate::store::{StoreError, Stores};
use actix_web::{
    delete, error, get, post, put,
    web::{self, Data, Json, Path, Query},
    HttpResponse, Responder,
};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Shared server state: stores, payment simulator and the draw random source.
pub struct AppState {
    pub stores: Stores,
    pub payments: PaymentSimulator,
    rng: Mutex<StdRng>,
}

impl AppState {
    pub fn new(stores: Stores, payments: PaymentSimulator, rng: StdRng) -> Self {
        Self {
            stores,
            payments,
            rng: Mutex::new(rng),
        }
    }

    /// Empty in-memory stores, SVG QR codes, and an RNG seeded from `DRAW_SEED` or entropy.
    pub fn from_config(config: &Config) -> Self {
        let rng = match config.draw_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let payments = PaymentSimulator::new(config.pix.clone(), Box::new(SvgQrRenderer));
        Self::new(Stores::in_memory(), payments, rng)
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct PlayerQuery {
    email: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentStatusBody {
    payment_status: PaymentStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchResultBody {
    winner_id: String,
    #[serde(default)]
    score: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleBody {
    #[serde(default)]
    scheduled_time: Option<DateTime<Utc>>,
    #[serde(default)]
    court: Option<String>,
}

/// Path segment: record id (e.g. /api/players/{id})
#[derive(Deserialize)]
struct IdPath {
    id: uuid::Uuid,
}

/// Path segments: tournament id and category name (e.g. /api/tournaments/{id}/categories/{category})
#[derive(Deserialize)]
struct CategoryPath {
    id: TournamentId,
    category: String,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    use TournamentError::*;
    let mut builder = match e {
        TournamentNotFound(_)
        | CategoryNotFound(_)
        | PlayerNotFound(_)
        | RegistrationNotFound(_)
        | MatchNotFound(_) => HttpResponse::NotFound(),
        DuplicateEmail
        | DuplicateRegistration
        | CategoryInUse(_)
        | Store(StoreError::RoundConflict { .. }) => {
            HttpResponse::Conflict()
        }
        Store(_) | Render(_) => {
            log::error!("Request failed: {}", e);
            HttpResponse::InternalServerError()
        }
        _ => HttpResponse::BadRequest(),
    };
    builder.json(serde_json::json!({ "error": e.to_string() }))
}

fn updated(entity: &str, record: impl Serialize, changed: bool) -> HttpResponse {
    let message = if changed {
        format!("{entity} updated")
    } else {
        "No changes detected".to_string()
    };
    HttpResponse::Ok().json(serde_json::json!({ "message": message, entity: record }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "beach-tournament-web",
    })
}

// Players

#[post("/api/players")]
async fn api_create_player(state: Data<AppState>, body: Json<NewPlayer>) -> HttpResponse {
    match logic::create_player(&state.stores, body.into_inner()) {
        Ok(player) => HttpResponse::Created().json(player),
        Err(e) => error_response(&e),
    }
}

/// List players; `?email=` narrows to one address.
#[get("/api/players")]
async fn api_list_players(state: Data<AppState>, query: Query<PlayerQuery>) -> HttpResponse {
    match logic::list_players(&state.stores, query.email.as_deref()) {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => error_response(&e),
    }
}

#[get("/api/players/{id}")]
async fn api_get_player(state: Data<AppState>, path: Path<IdPath>) -> HttpResponse {
    match logic::get_player(&state.stores, path.id) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(&e),
    }
}

#[put("/api/players/{id}")]
async fn api_update_player(
    state: Data<AppState>,
    path: Path<IdPath>,
    body: Json<PlayerUpdate>,
) -> HttpResponse {
    match logic::update_player(&state.stores, path.id, body.into_inner()) {
        Ok((player, changed)) => updated("player", player, changed),
        Err(e) => error_response(&e),
    }
}

/// Delete a player and their registrations.
#[delete("/api/players/{id}")]
async fn api_delete_player(state: Data<AppState>, path: Path<IdPath>) -> HttpResponse {
    match logic::delete_player(&state.stores, path.id) {
        Ok(removed) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Player deleted",
            "registrationsRemoved": removed,
        })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/players/{id}/registrations")]
async fn api_player_registrations(state: Data<AppState>, path: Path<IdPath>) -> HttpResponse {
    let id: PlayerId = path.id;
    match logic::registrations_for_player(&state.stores, id) {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_response(&e),
    }
}

// Tournaments

#[post("/api/tournaments")]
async fn api_create_tournament(state: Data<AppState>, body: Json<NewTournament>) -> HttpResponse {
    match logic::create_tournament(&state.stores, body.into_inner()) {
        Ok(tournament) => HttpResponse::Created().json(tournament),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: Data<AppState>) -> HttpResponse {
    match logic::list_tournaments(&state.stores) {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: Data<AppState>, path: Path<IdPath>) -> HttpResponse {
    match logic::get_tournament(&state.stores, path.id) {
        Ok(tournament) => HttpResponse::Ok().json(tournament),
        Err(e) => error_response(&e),
    }
}

#[put("/api/tournaments/{id}")]
async fn api_update_tournament(
    state: Data<AppState>,
    path: Path<IdPath>,
    body: Json<TournamentUpdate>,
) -> HttpResponse {
    match logic::update_tournament(&state.stores, path.id, body.into_inner()) {
        Ok((tournament, changed)) => updated("tournament", tournament, changed),
        Err(e) => error_response(&e),
    }
}

/// Delete a tournament with its registrations and matches.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: Data<AppState>, path: Path<IdPath>) -> HttpResponse {
    match logic::delete_tournament(&state.stores, path.id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Tournament deleted with its registrations and matches"
        })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/registrations")]
async fn api_tournament_registrations(state: Data<AppState>, path: Path<IdPath>) -> HttpResponse {
    match logic::registrations_for_tournament(&state.stores, path.id) {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_response(&e),
    }
}

// Registrations

#[post("/api/registrations")]
async fn api_create_registration(
    state: Data<AppState>,
    body: Json<NewRegistration>,
) -> HttpResponse {
    match logic::create_registration(&state.stores, body.into_inner()) {
        Ok(registration) => HttpResponse::Created().json(registration),
        Err(e) => error_response(&e),
    }
}

#[get("/api/registrations")]
async fn api_list_registrations(state: Data<AppState>) -> HttpResponse {
    match logic::list_registrations(&state.stores) {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_response(&e),
    }
}

#[get("/api/registrations/{id}")]
async fn api_get_registration(state: Data<AppState>, path: Path<IdPath>) -> HttpResponse {
    match logic::get_registration(&state.stores, path.id) {
        Ok(registration) => HttpResponse::Ok().json(registration),
        Err(e) => error_response(&e),
    }
}

#[put("/api/registrations/{id}")]
async fn api_update_registration(
    state: Data<AppState>,
    path: Path<IdPath>,
    body: Json<RegistrationUpdate>,
) -> HttpResponse {
    match logic::update_registration(&state.stores, path.id, body.into_inner()) {
        Ok((registration, changed)) => updated("registration", registration, changed),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/registrations/{id}")]
async fn api_delete_registration(state: Data<AppState>, path: Path<IdPath>) -> HttpResponse {
    match logic::delete_registration(&state.stores, path.id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "message": "Registration deleted" })),
        Err(e) => error_response(&e),
    }
}

/// Issue a simulated PIX charge for the registration's fee.
#[post("/api/registrations/{id}/pix")]
async fn api_generate_pix(state: Data<AppState>, path: Path<IdPath>) -> HttpResponse {
    let id: RegistrationId = path.id;
    match state.payments.generate_pix(&state.stores, id) {
        Ok(pix) => HttpResponse::Ok().json(serde_json::json!({
            "message": "PIX generated",
            "pixDetails": pix,
        })),
        Err(e) => error_response(&e),
    }
}

#[put("/api/registrations/{id}/status")]
async fn api_set_payment_status(
    state: Data<AppState>,
    path: Path<IdPath>,
    body: Json<PaymentStatusBody>,
) -> HttpResponse {
    match logic::set_payment_status(&state.stores, path.id, body.payment_status) {
        Ok((registration, changed)) => updated("registration", registration, changed),
        Err(e) => error_response(&e),
    }
}

// Draws and matches

/// Generate (or regenerate) the single-elimination draw of a category.
#[post("/api/tournaments/{id}/categories/{category}/draw")]
async fn api_generate_draw(state: Data<AppState>, path: Path<CategoryPath>) -> HttpResponse {
    let mut rng = match state.rng.lock() {
        Ok(guard) => guard,
        Err(_) => {
            return HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Draw random source unavailable" }))
        }
    };
    match logic::generate_category_draw(&state.stores, path.id, &path.category, &mut *rng) {
        Ok(summary) => HttpResponse::Created().json(summary),
        Err(e) => error_response(&e),
    }
}

/// Matches of a category sorted by round, then match number.
#[get("/api/tournaments/{id}/categories/{category}/matches")]
async fn api_category_matches(state: Data<AppState>, path: Path<CategoryPath>) -> HttpResponse {
    match logic::category_matches(&state.stores, path.id, &path.category) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// Create the next round from the winners of the latest one.
#[post("/api/tournaments/{id}/categories/{category}/advance")]
async fn api_advance_round(state: Data<AppState>, path: Path<CategoryPath>) -> HttpResponse {
    match logic::advance_round(&state.stores, path.id, &path.category) {
        Ok(summary) => HttpResponse::Created().json(summary),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/categories/{category}/champion")]
async fn api_champion(state: Data<AppState>, path: Path<CategoryPath>) -> HttpResponse {
    match logic::champion(&state.stores, path.id, &path.category) {
        Ok(champion) => HttpResponse::Ok().json(serde_json::json!({ "champion": champion })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: Data<AppState>, path: Path<IdPath>) -> HttpResponse {
    let id: MatchId = path.id;
    match state.stores.matches.get(id) {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => error_response(&TournamentError::MatchNotFound(id)),
        Err(e) => error_response(&TournamentError::from(e)),
    }
}

#[put("/api/matches/{id}/result")]
async fn api_record_result(
    state: Data<AppState>,
    path: Path<IdPath>,
    body: Json<MatchResultBody>,
) -> HttpResponse {
    let body = body.into_inner();
    match logic::record_result(&*state.stores.matches, path.id, &body.winner_id, body.score) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => error_response(&e),
    }
}

#[put("/api/matches/{id}/schedule")]
async fn api_schedule_match(
    state: Data<AppState>,
    path: Path<IdPath>,
    body: Json<ScheduleBody>,
) -> HttpResponse {
    let body = body.into_inner();
    match logic::schedule_match(&*state.stores.matches, path.id, body.scheduled_time, body.court) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => error_response(&e),
    }
}

/// Register every route plus JSON/path extractor errors rendered as `{"error": ...}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let body = serde_json::json!({ "error": err.to_string() });
        error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        let body = serde_json::json!({ "error": format!("Invalid id: {err}") });
        error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    }))
    .service(api_health)
    .service(api_create_player)
    .service(api_list_players)
    .service(api_get_player)
    .service(api_update_player)
    .service(api_delete_player)
    .service(api_player_registrations)
    .service(api_create_tournament)
    .service(api_list_tournaments)
    .service(api_get_tournament)
    .service(api_update_tournament)
    .service(api_delete_tournament)
    .service(api_tournament_registrations)
    .service(api_create_registration)
    .service(api_list_registrations)
    .service(api_get_registration)
    .service(api_update_registration)
    .service(api_delete_registration)
    .service(api_generate_pix)
    .service(api_set_payment_status)
    .service(api_generate_draw)
    .service(api_category_matches)
    .service(api_advance_round)
    .service(api_champion)
    .service(api_get_match)
    .service(api_record_result)
    .service(api_schedule_match);
}
