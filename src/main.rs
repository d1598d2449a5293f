use actix_web::{web, App, HttpServer};
use log::info;
use std::sync::Arc;

mod config;
mod engine;
mod error;
mod game;
mod models;
mod routes;
mod session;
mod websocket;

use config::AppConfig;
use engine::HttpMoveSource;
use models::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::load();
    let engine = HttpMoveSource::new(&config.engine_url, config.engine_timeout()).map_err(std::io::Error::other)?;
    info!("Using move service at {}", engine.endpoint());
    info!("Starting chess session server at http://{}", config.bind);

    let bind = config.bind.clone();
    let static_dir = config.static_dir.clone();
    let app_state = web::Data::new(AppState::new(config, Arc::new(engine)));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(|cfg| routes::configure_routes(cfg, &static_dir))
    })
    .bind(bind)?
    .run()
    .await
}
