//! Qwirkle Server - HTTP API over the rules engine
//!
//! This crate provides the web backend:
//! - REST API for creating, joining and playing games
//! - Tile catalog for clients
//! - Optional static file serving for a browser client

mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use qwirkle_core::EngineConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory served for any path outside /api
    pub static_dir: Option<String>,
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8088,
            static_dir: None,
            engine: EngineConfig::default(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let router = Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Tile catalog
        .route("/api/tiles", get(routes::tiles::get_tiles))
        // Game API
        .route("/api/games", post(routes::games::create_game))
        .route("/api/games/:id", get(routes::games::get_game_state))
        .route("/api/games/:id/join", post(routes::games::join_game))
        .route("/api/games/:id/moves", post(routes::games::submit_move))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive());

    // Static file serving (must be last)
    match &config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new(config.engine.clone()));
    let router = create_router(&config, state);

    tracing::info!("Qwirkle server starting on http://0.0.0.0:{}", config.port);
    if let Some(dir) = &config.static_dir {
        tracing::info!("Static files served from: {}", dir);
    }
    if let Some(seed) = config.engine.seed {
        tracing::info!("Deck seed fixed at {}", seed);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
