//! Performance Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::engine::ResetOutcome;
use crate::utils::AppResult;

/// POST /api/performance/reset - zero the rolling month counters
///
/// Triggered by an external scheduler at month boundaries; the engine does
/// not schedule itself.
pub async fn monthly_reset(State(state): State<ServerState>) -> AppResult<Json<ResetOutcome>> {
    let outcome = state.engine.monthly_reset().await?;
    Ok(Json(outcome))
}
