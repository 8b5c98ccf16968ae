//! HTTP and WebSocket surface (distilled spec §6): REST handlers that
//! delegate to the turn orchestrator, WebSocket endpoints that tail
//! per-game streams, and the process wiring that ties them to a
//! shared database connection, AI registry, and room registry.
mod auth;
mod error;
mod games;

pub use error::ApiError;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use arena_players::Registry;
use std::sync::Arc;

/// Process-wide configuration, read once at startup and injected as
/// `web::Data<Config>` rather than re-read ad hoc in handlers
/// (distilled spec's Design Note on global mutable state).
pub struct Config {
    pub bind_addr: String,
    pub reset_db_on_startup: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").expect("BIND_ADDR must be set"),
            reset_db_on_startup: std::env::var("RESET_DB_ON_STARTUP")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

async fn health(client: web::Data<Arc<tokio_postgres::Client>>) -> impl Responder {
    match client.execute("SELECT 1", &[]).await.inspect_err(|e| log::error!("health check failed: {e}")) {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

#[rustfmt::skip]
pub async fn run() -> Result<(), std::io::Error> {
    let config = Config::from_env();
    let client = arena_database::db().await;

    arena_database::migrate(&client).await.expect("migrate arena-database tables");
    arena_auth::migrate(&client).await.expect("migrate arena-auth tables");
    arena_records::migrate(&client).await.expect("migrate arena-records tables");

    if config.reset_db_on_startup {
        log::warn!("RESET_DB_ON_STARTUP set: truncating game rows");
        let _ = client.batch_execute(<arena_database::GameRow as arena_database::Schema>::truncates()).await;
    }

    let registry = Arc::new(Registry::builtin());
    let arena = web::Data::new(Arc::new(arena_hosting::Arena::new(client.clone(), registry)));
    let crypto = web::Data::new(arena_auth::Crypto::from_env());
    let client_data = web::Data::new(client);
    let config = web::Data::new(config);

    log::info!("starting arena server on {}", config.bind_addr);
    let bind_addr = config.bind_addr.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .app_data(arena.clone())
            .app_data(crypto.clone())
            .app_data(client_data.clone())
            .app_data(config.clone())
            .route("/health", web::get().to(health))
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::signup))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/{kind}")
                    .route("/", web::get().to(games::list))
                    .route("/", web::post().to(games::create))
                    .route("/{id}", web::get().to(games::get))
                    .route("/{id}", web::delete().to(games::delete))
                    .route("/{id}/move", web::post().to(games::apply_move))
                    .route("/{id}/undo", web::post().to(games::undo))
                    .route("/{id}/visualize_ai", web::post().to(games::visualize_ai)),
            )
            .route("/ws/{kind}/{id}", web::get().to(games::ws))
    })
    .workers(num_cpus())
    .bind(bind_addr)?
    .run()
    .await
}

fn num_cpus() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}
