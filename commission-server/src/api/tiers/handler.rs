//! Tier Catalog Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{CommissionTier, TierCreate, TierUpdate};

use crate::core::ServerState;
use crate::db::repository::tier;
use crate::utils::{AppError, AppResult};

/// GET /api/tiers - full catalog in promotion order
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<CommissionTier>>> {
    let tiers = tier::find_all(&state.pool).await?;
    Ok(Json(tiers))
}

/// GET /api/tiers/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CommissionTier>> {
    let tier = tier::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Tier {id}")))?;
    Ok(Json(tier))
}

/// POST /api/tiers - create a catalog entry
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TierCreate>,
) -> AppResult<Json<CommissionTier>> {
    let tier = tier::create(&state.pool, payload).await?;
    Ok(Json(tier))
}

/// PUT /api/tiers/:id - update a catalog entry
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TierUpdate>,
) -> AppResult<Json<CommissionTier>> {
    let tier = tier::update(&state.pool, id, payload).await?;
    Ok(Json(tier))
}

/// DELETE /api/tiers/:id - soft delete (deactivate)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = tier::delete(&state.pool, id).await?;
    Ok(Json(deleted))
}
