use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use yatra_api::routes;
use yatra_api::state::AppState;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let state = web::Data::new(AppState::new());
    log::info!(
        "POI catalog loaded with {} entries, binding to {}:{}",
        state.catalog.len(),
        host,
        port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(state.clone())
            .app_data(routes::json_config())
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .route(
                        "/generate-itinerary",
                        web::post().to(routes::itinerary::generate),
                    )
                    .route(
                        "/available-pois",
                        web::get().to(routes::itinerary::available_pois),
                    )
                    .route("/options", web::get().to(routes::itinerary::options))
                    .route("/chat", web::post().to(routes::chat::chat)),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
