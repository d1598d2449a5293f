use actix_files as fs;
use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use std::path::Path;

use crate::models::AppState;

/// HTTP handler for the index page
pub async fn index(req: HttpRequest, app_state: web::Data<AppState>) -> HttpResponse {
    let page = Path::new(&app_state.config.static_dir).join("index.html");
    match fs::NamedFile::open_async(&page).await {
        Ok(file) => file.into_response(&req),
        Err(e) => {
            info!("No board client at {}: {}", page.display(), e);
            HttpResponse::Ok().body("Chess session server: connect a board client to /ws")
        }
    }
}

/// Configure the HTTP routes
pub fn configure_routes(cfg: &mut web::ServiceConfig, static_dir: &str) {
    cfg.service(web::resource("/ws").route(web::get().to(crate::websocket::ws_index)))
        .service(web::resource("/").route(web::get().to(index)))
        .service(fs::Files::new("/static", static_dir));
}
