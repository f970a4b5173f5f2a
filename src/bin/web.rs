//! Single binary web server exposing the tournament REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Scoring defaults can be changed with BYE_POINTS and TIEBREAK_FLOOR.

use actix_web::{get, web::Data, App, HttpResponse, HttpServer};
use std::sync::Arc;
use swiss_tournament_web::{api, MemoryStore, ScoringConfig, ServerConfig, TournamentService};

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let server = ServerConfig::from_env();
    let scoring = ScoringConfig::from_env();
    log::info!(
        "Starting server at http://{}:{} (bye worth {} points, tiebreak floor {:.3})",
        server.host,
        server.port,
        scoring.bye_points,
        scoring.tiebreak_floor
    );

    let state = Data::new(TournamentService::new(Arc::new(MemoryStore::new()), scoring));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(favicon)
            .configure(api::configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
