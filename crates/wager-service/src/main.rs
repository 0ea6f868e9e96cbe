//! Wager Service
//!
//! HTTP facade over the commit-reveal RPS wagering engine. The value
//! transfer layer is the in-memory mock (with a faucet endpoint), so the
//! whole flow can be driven end to end from an HTTP client.

mod handlers;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wager_engine::ArenaConfig;

use handlers::*;
use state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let env_secs = |name: &str, default: i64| -> i64 {
        std::env::var(name)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(default)
    };
    let config = ArenaConfig {
        join_window_secs: env_secs("JOIN_WINDOW_SECS", 3600),
        reveal_window_secs: env_secs("REVEAL_WINDOW_SECS", 600),
    };
    tracing::info!(
        "deadline windows: join {}s, reveal {}s",
        config.join_window_secs,
        config.reveal_window_secs
    );

    let state = AppState::new(config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Player
        .route("/api/player/register", post(register_player))
        .route("/api/player/me", get(get_current_player))
        // Ledger
        .route("/api/deposit", post(deposit))
        .route("/api/withdraw", post(withdraw))
        .route("/api/withdraw_all", post(withdraw_all))
        .route("/api/balance", get(get_balance))
        // Matches
        .route("/api/match/host", post(host_match))
        .route("/api/match/:host", get(get_match))
        .route("/api/match/:host/join", post(join_match))
        .route("/api/match/:host/reveal", post(reveal_move))
        .route("/api/match/:host/claim_timeout", post(claim_timeout))
        // Events
        .route("/api/events", get(list_events))
        // Demo helpers
        .route("/api/commitment", post(make_commitment))
        .route("/api/faucet", post(faucet))
        // System
        .route("/api/system/tick", post(tick))
        // Health
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Wager service starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn health() -> &'static str {
    "ok"
}
