//! HTTP surface: text generation, result recording and statistics.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;

use crate::config::Config;
use crate::error::Result;
use crate::stats::StatsDb;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub use error::ApiError;

/// Shared by all handlers. The config is read-only after startup; the
/// database connection is used by one request at a time.
pub struct AppState {
    pub config: Config,
    db: Mutex<StatsDb>,
}

impl AppState {
    pub fn new(config: Config, db: StatsDb) -> Self {
        Self {
            config,
            db: Mutex::new(db),
        }
    }

    /// Open the database named by `config`
    pub fn open(config: Config) -> Result<Self> {
        let db = StatsDb::open(config.database_path())?;
        Ok(Self::new(config, db))
    }

    pub fn db(&self) -> MutexGuard<'_, StatsDb> {
        // Writes are single statements, a poisoned lock holds nothing partial
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let config = &app_state.config;
    let prefix = config.api_prefix.trim_end_matches('/');

    let router = if prefix.is_empty() {
        Router::new().merge(api_routes())
    } else {
        Router::new().nest(prefix, api_routes())
    };

    let router = router
        .route("/health", get(handlers::health_check))
        .route("/favicon.svg", get(handlers::favicon));

    let router = match &config.frontend_dir {
        Some(dir) => {
            let index = dir.join("html").join("index.html");
            let statistics = dir.join("html").join("statistics.html");
            router
                .route_service("/", ServeFile::new(index))
                .route_service("/statistics/{user_id}", ServeFile::new(statistics))
                .nest_service("/static/css", ServeDir::new(dir.join("css")))
                .nest_service("/static/js", ServeDir::new(dir.join("js")))
        }
        None => router,
    };

    let cors = cors_layer(&config.allowed_origins);

    router
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/text", get(handlers::get_text))
        .route("/test-result", post(handlers::save_test_result))
        .route("/statistics/{user_id}", get(handlers::get_user_statistics))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    // Credentials rule out wildcards, so methods and headers are mirrored
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Bind to the configured address and serve until Ctrl-C
pub async fn serve(app_state: Arc<AppState>) -> anyhow::Result<()> {
    let address = app_state.config.bind_address();
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
