//! # Foodify Binary
//!
//! The entry point that assembles the application based on compile-time features.

use std::io;

use actix_web::{web, App, HttpServer};
use foodify_api::handlers::AppState;
use foodify_api::middleware::{cors_policy, standard_middleware};
use foodify_config::Settings;

// Feature-gated imports: the storage plugin is chosen at compile time
#[cfg(feature = "db-mongo")]
use foodify_db_mongo::MongoStore;

#[cfg(all(feature = "db-memory", not(feature = "db-mongo")))]
use foodify_db_memory::MemoryStore;

#[cfg(not(any(feature = "db-mongo", feature = "db-memory")))]
compile_error!("enable a storage plugin: `db-mongo` or `db-memory`");

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Settings first so RUST_LOG from .env reaches the logger.
    let settings = Settings::load();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Faults outside a request still end up in the log.
    std::panic::set_hook(Box::new(|info| {
        log::error!("💥 Unhandled panic: {info}");
    }));

    let settings = settings.map_err(|err| {
        log::error!("❌ {err}");
        io::Error::other(err)
    })?;

    // 1. Initialize Storage Implementation
    #[cfg(feature = "db-mongo")]
    let store = connect_mongo(&settings).await;

    #[cfg(all(feature = "db-memory", not(feature = "db-mongo")))]
    let store = open_memory(&settings).await?;

    // 2. Wrap in AppState (dynamic dispatch, so tests can swap the store)
    let state = web::Data::new(AppState {
        foods: Box::new(store.clone()),
        orders: Box::new(store),
    });
    let origins = settings.allowed_origins();

    log::info!("🚀 Server running on port {}", settings.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors_policy(&origins))
            .wrap(standard_middleware())
            .configure(foodify_api::configure_routes)
    })
    .bind((settings.bind_address.as_str(), settings.port))?
    .run()
    .await
}

/// Builds the client once and pings it. A failed ping is logged, not fatal.
#[cfg(feature = "db-mongo")]
async fn connect_mongo(settings: &Settings) -> MongoStore {
    use secrecy::ExposeSecret;

    let store = MongoStore::connect(settings.connection_uri().expose_secret(), &settings.db_name).await;
    match store.ping().await {
        Ok(()) => log::info!("✅ Pinged MongoDB successfully"),
        Err(err) => log::error!("❌ MongoDB ping failed: {err:#}"),
    }
    store
}

#[cfg(all(feature = "db-memory", not(feature = "db-mongo")))]
async fn open_memory(settings: &Settings) -> io::Result<MemoryStore> {
    match &settings.seed_file {
        Some(path) => MemoryStore::load_seed(path).await.map_err(io::Error::other),
        None => {
            log::warn!("No SEED_FILE set; starting with an empty in-memory store");
            Ok(MemoryStore::new())
        }
    }
}
