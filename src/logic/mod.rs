//! Tournament business logic: catalogue, registrations, payments, draws and bracket progression.

mod draw;
mod payment;
mod players;
mod progression;
mod registrations;
mod tournaments;

pub use draw::{
    confirmed_players, draw_size_for, generate_category_draw, generate_draw, round_label,
    DrawResult, DrawSummary,
};
pub use payment::{
    br_code_payload, crc16, CodeRenderer, PaymentSimulator, PixSettings, SvgQrRenderer,
    MAX_PIX_KEY_LEN,
};
pub use players::{create_player, delete_player, get_player, list_players, update_player};
pub use progression::{
    advance_round, category_matches, champion, record_result, schedule_match, RoundSummary,
};
pub use registrations::{
    create_registration, delete_registration, get_registration, list_registrations,
    registrations_for_player, registrations_for_tournament, set_payment_status,
    update_registration,
};
pub use tournaments::{
    create_tournament, delete_tournament, get_tournament, list_tournaments, update_tournament,
};
