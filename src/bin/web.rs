//! Single binary web server for the tournament REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env (or a .env file): HOST, PORT, DRAW_SEED, PIX_KEY, PIX_RECEIVER_NAME, PIX_RECEIVER_CITY.

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use beach_tournament_web::{configure, AppState, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    if config.draw_seed.is_some() {
        log::warn!("DRAW_SEED is set: draws are reproducible");
    }

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(AppState::from_config(&config));

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}
