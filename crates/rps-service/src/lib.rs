//! RPS Registry Service
//!
//! HTTP front end for a single game registry backed by an in-memory ledger.

pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use handlers::*;
pub use config::ServiceConfig;
pub use state::AppState;

/// Build the HTTP router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Registry
        .route("/api/config", get(get_config))
        .route("/api/commitments", post(compute_commitment))
        .route("/api/games", post(create_game))
        .route("/api/games", get(list_games))
        .route("/api/games/:id", get(get_game))
        .route("/api/games/:id/join", post(join_game))
        .route("/api/games/:id/reveal", post(reveal_move))
        .route("/api/games/:id/refund", post(refund_game))
        .route("/api/events", get(list_events))
        // Ledger
        .route("/api/accounts/:address", get(get_account))
        .route("/api/accounts/:address/fund", post(fund_account))
        // System
        .route("/api/system/tick", post(tick))
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state)
}
