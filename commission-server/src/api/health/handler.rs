//! Health API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(serde::Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health - liveness + database ping
pub async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthStatus>> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
