use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod assets;
mod auth;
mod cache;
mod config;
mod db;
mod dto;
mod error;
mod handlers;
mod models;
mod resolver;
mod search;
mod store;
mod vault;

use cache::MemoryCache;
use config::Config;
use resolver::DailyCardResolver;
use store::postgres::PgEntryStore;
use store::EntryStore;
use vault::JournalVault;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub resolver: Arc<DailyCardResolver>,
    pub vault: Arc<JournalVault>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodvault_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    let db = db::create_pool(&config.database_url).await;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations applied");

    let entry_store: Arc<dyn EntryStore> = Arc::new(PgEntryStore::new(db.clone()));
    let local_cache = Arc::new(MemoryCache::new());

    let resolver = Arc::new(DailyCardResolver::new(
        Arc::clone(&entry_store),
        local_cache,
    ));
    let vault = Arc::new(JournalVault::new(
        Arc::clone(&entry_store),
        Duration::from_millis(config.undo_grace_ms),
    ));

    let state = AppState {
        db,
        config: config.clone(),
        resolver,
        vault,
    };

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/refresh", post(handlers::auth::refresh));

    let protected_routes = Router::new()
        .route("/api/me", get(handlers::auth::me))
        .route("/api/auth/logout", post(handlers::auth::logout))
        // Daily card
        .route("/api/cards/today", get(handlers::cards::todays_card))
        // Journal vault
        .route("/api/entries", get(handlers::entries::list_entries))
        .route("/api/entries", post(handlers::entries::create_entry))
        .route("/api/entries/search", get(handlers::entries::search_entries))
        .route("/api/entries/:id", put(handlers::entries::edit_entry))
        .route("/api/entries/:id", delete(handlers::entries::delete_entry))
        .route("/api/entries/:id/undo", post(handlers::entries::undo_delete))
        .route(
            "/api/entries/pending/cancel",
            post(handlers::entries::cancel_pending),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let allowed_origin = config
        .frontend_url
        .parse::<axum::http::HeaderValue>()
        .expect("FRONTEND_URL must be a valid origin");
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app)
        .await
        .expect("Server exited with error");
}
