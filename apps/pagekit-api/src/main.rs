//! Pagekit API Server - page-level PDF editing
//!
//! Provides REST endpoints for:
//! - Document inspection, merge and split
//! - Page reordering and rotation
//! - Highlight annotations from viewer selections
//! - Metadata stripping and compression

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;
mod error;
mod handlers;
mod models;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pagekit_api=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let config = Config::from_env();
    let addr = config.addr();
    let state = Arc::new(AppState::new(config));

    let app = router(state);

    info!("Starting pagekit API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/info", post(handlers::info))
        .route("/merge", post(handlers::merge))
        .route("/split", post(handlers::split))
        .route("/reorder", post(handlers::reorder))
        .route("/rotate", post(handlers::rotate))
        .route("/annotate/highlight", post(handlers::highlight))
        .route("/metadata/strip", post(handlers::strip_metadata))
        .route("/compress", post(handlers::compress))
        .route("/unlock", post(handlers::unlock))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
