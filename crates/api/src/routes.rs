use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use botstate_core::{BotRecord, ToggledBot};
use serde::Deserialize;
use std::sync::Arc;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Health
        .route("/health", get(health_check))
        // Bots
        .route("/bots", get(list_bots))
        .route("/bots/{id}", get(get_bot).put(set_bot_state))
        .route("/bots/{id}/toggle", post(toggle_bot))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ---------------------------------------------------------------------------
// Bots
// ---------------------------------------------------------------------------

async fn list_bots(State(state): State<Arc<AppState>>) -> Result<Json<Vec<BotRecord>>, ApiError> {
    let bots = state.store.list_bots().await?;
    Ok(Json(bots))
}

/// Reads a bot, creating it switched off on first access.
async fn get_bot(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<BotRecord>, ApiError> {
    let Path(id) = id?;
    let bot = state.store.read_or_init_bot(id).await?;
    Ok(Json(bot))
}

#[derive(Deserialize)]
struct SetBotStateRequest {
    is_on: bool,
}

async fn set_bot_state(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<SetBotStateRequest>, JsonRejection>,
) -> Result<Json<BotRecord>, ApiError> {
    let Path(id) = id?;
    let Json(req) = body?;
    let bot = state.store.set_bot_state(id, req.is_on).await?;
    Ok(Json(bot))
}

async fn toggle_bot(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ToggledBot>, ApiError> {
    let Path(id) = id?;
    let toggled = state.store.toggle_bot(id).await?;
    Ok(Json(toggled))
}
