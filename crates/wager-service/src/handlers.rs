//! HTTP API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use wager_core::{Commitment, Nonce, PlayerId};
use wager_engine::{EngineError, Move, Phase};

use crate::state::AppState;

// ============ Request types ============

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct AmountRequest {
    pub amount: u64,
}

#[derive(Deserialize)]
pub struct HostRequest {
    pub bet: u64,
    /// Hex-encoded 32-byte commitment digest
    pub commitment: String,
}

#[derive(Deserialize)]
pub struct JoinRequest {
    pub commitment: String,
}

#[derive(Deserialize)]
pub struct RevealRequest {
    pub r#move: Move,
    /// Hex-encoded 32-byte nonce
    pub nonce: String,
}

#[derive(Deserialize)]
pub struct CommitmentRequest {
    pub r#move: Move,
    /// Hex-encoded 32-byte nonce; generated if omitted
    pub nonce: Option<String>,
}

#[derive(Deserialize)]
pub struct TickRequest {
    pub seconds: i64,
}

// ============ Helpers ============

fn get_player_id_from_header(headers: &axum::http::HeaderMap) -> Option<PlayerId> {
    headers
        .get("X-Player-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
}

fn missing_identity() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"error": "Missing X-Player-Id header"})),
    )
}

fn parse_digest(s: &str) -> Option<[u8; 32]> {
    let bytes = hex::decode(s).ok()?;
    bytes.try_into().ok()
}

fn engine_error(err: EngineError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match err {
        EngineError::NotAParticipant => StatusCode::FORBIDDEN,
        EngineError::TransferFailed(_) => StatusCode::PAYMENT_REQUIRED,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(serde_json::json!({"error": err.to_string()})))
}

// ============ Player handlers ============

pub async fn register_player(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    let id = state.register_player(req.name.clone());
    (
        StatusCode::OK,
        Json(serde_json::json!({"player_id": id, "name": req.name})),
    )
}

pub async fn get_current_player(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> impl IntoResponse {
    let id = match get_player_id_from_header(&headers) {
        Some(id) => id,
        None => return missing_identity(),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "player_id": id,
            "name": state.player_name(id),
            "balance": state.arena().balance(id),
            "external_balance": state.transfer().external_balance(id),
        })),
    )
}

pub async fn get_balance(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> impl IntoResponse {
    let id = match get_player_id_from_header(&headers) {
        Some(id) => id,
        None => return missing_identity(),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({"balance": state.arena().balance(id)})),
    )
}

// ============ Ledger handlers ============

pub async fn deposit(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Json(req): Json<AmountRequest>,
) -> impl IntoResponse {
    let id = match get_player_id_from_header(&headers) {
        Some(id) => id,
        None => return missing_identity(),
    };

    match state.arena().deposit(id, req.amount).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"balance": state.arena().balance(id)})),
        ),
        Err(err) => engine_error(err),
    }
}

pub async fn withdraw(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Json(req): Json<AmountRequest>,
) -> impl IntoResponse {
    let id = match get_player_id_from_header(&headers) {
        Some(id) => id,
        None => return missing_identity(),
    };

    match state.arena().withdraw_exact(id, req.amount).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"balance": state.arena().balance(id)})),
        ),
        Err(err) => engine_error(err),
    }
}

pub async fn withdraw_all(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> impl IntoResponse {
    let id = match get_player_id_from_header(&headers) {
        Some(id) => id,
        None => return missing_identity(),
    };

    match state.arena().withdraw_all(id).await {
        Ok(amount) => (
            StatusCode::OK,
            Json(serde_json::json!({"withdrawn": amount})),
        ),
        Err(err) => engine_error(err),
    }
}

// ============ Match handlers ============

pub async fn host_match(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Json(req): Json<HostRequest>,
) -> impl IntoResponse {
    let id = match get_player_id_from_header(&headers) {
        Some(id) => id,
        None => return missing_identity(),
    };
    let digest = match parse_digest(&req.commitment) {
        Some(digest) => digest,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid commitment encoding"})),
            )
        }
    };

    match state.arena().host(id, req.bet, Commitment::from_bytes(digest)) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"status": "hosted", "bet": req.bet})),
        ),
        Err(err) => engine_error(err),
    }
}

pub async fn join_match(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Path(host): Path<String>,
    Json(req): Json<JoinRequest>,
) -> impl IntoResponse {
    let id = match get_player_id_from_header(&headers) {
        Some(id) => id,
        None => return missing_identity(),
    };
    let host: PlayerId = match host.parse() {
        Ok(host) => host,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid host id"})),
            )
        }
    };
    let digest = match parse_digest(&req.commitment) {
        Some(digest) => digest,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid commitment encoding"})),
            )
        }
    };

    match state.arena().join(id, host, Commitment::from_bytes(digest)) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"status": "joined"})),
        ),
        Err(err) => engine_error(err),
    }
}

pub async fn reveal_move(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Path(host): Path<String>,
    Json(req): Json<RevealRequest>,
) -> impl IntoResponse {
    let id = match get_player_id_from_header(&headers) {
        Some(id) => id,
        None => return missing_identity(),
    };
    let host: PlayerId = match host.parse() {
        Ok(host) => host,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid host id"})),
            )
        }
    };
    let nonce = match parse_digest(&req.nonce) {
        Some(bytes) => Nonce::from_bytes(bytes),
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid nonce encoding"})),
            )
        }
    };

    match state.arena().reveal(id, host, req.r#move, &nonce) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "revealed",
                "phase": state.arena().phase(host),
            })),
        ),
        Err(err) => engine_error(err),
    }
}

pub async fn claim_timeout(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Path(host): Path<String>,
) -> impl IntoResponse {
    let id = match get_player_id_from_header(&headers) {
        Some(id) => id,
        None => return missing_identity(),
    };
    let host: PlayerId = match host.parse() {
        Ok(host) => host,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid host id"})),
            )
        }
    };

    match state.arena().claim_timeout(id, host) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"status": "timed_out"})),
        ),
        Err(err) => engine_error(err),
    }
}

pub async fn get_match(
    State(state): State<AppState>,
    Path(host): Path<String>,
) -> impl IntoResponse {
    let host: PlayerId = match host.parse() {
        Ok(host) => host,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid host id"})),
            )
        }
    };

    match state.arena().slot(host) {
        Some(slot) => (StatusCode::OK, Json(serde_json::json!(slot))),
        None => (
            StatusCode::OK,
            Json(serde_json::json!({"phase": Phase::Closed})),
        ),
    }
}

// ============ Event feed ============

pub async fn list_events(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({"events": state.arena().events()}))
}

// ============ Demo helpers ============

/// Compute a commitment digest for the caller. Demo convenience only: a
/// real client computes this locally and never shows the move before reveal.
pub async fn make_commitment(
    State(_state): State<AppState>,
    headers: axum::http::HeaderMap,
    Json(req): Json<CommitmentRequest>,
) -> impl IntoResponse {
    let id = match get_player_id_from_header(&headers) {
        Some(id) => id,
        None => return missing_identity(),
    };
    let nonce = match req.nonce {
        Some(s) => match parse_digest(&s) {
            Some(bytes) => Nonce::from_bytes(bytes),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"error": "Invalid nonce encoding"})),
                )
            }
        },
        None => Nonce::random(),
    };

    let commitment = Commitment::new(req.r#move.to_bytes(), &nonce, id);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "commitment": commitment.to_string(),
            "nonce": hex::encode(nonce.as_bytes()),
        })),
    )
}

/// Credit the caller's external mock balance and approve pulls for it
pub async fn faucet(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Json(req): Json<AmountRequest>,
) -> impl IntoResponse {
    let id = match get_player_id_from_header(&headers) {
        Some(id) => id,
        None => return missing_identity(),
    };

    state.transfer().fund(id, req.amount);
    // Approve pulls for everything currently available
    let external_balance = state.transfer().external_balance(id);
    state.transfer().approve(id, external_balance);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "external_balance": state.transfer().external_balance(id),
        })),
    )
}

// ============ System handlers ============

pub async fn tick(
    State(state): State<AppState>,
    Json(req): Json<TickRequest>,
) -> impl IntoResponse {
    state.arena().advance_time(req.seconds);
    (
        StatusCode::OK,
        Json(serde_json::json!({"now": state.arena().now()})),
    )
}
