//! Participant API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use shared::models::{
    CommissionSettingsUpdate, CommissionSummary, User, UserCommissionDetail, UserCreate,
};

use crate::core::ServerState;
use crate::db::repository::user;
use crate::engine::ledger;
use crate::utils::{AppError, AppResult};

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(serde::Deserialize)]
pub struct PeriodQuery {
    pub year: Option<i64>,
    pub month: Option<i64>,
}

/// GET /api/users - list participants
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<User>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let offset = query.offset.unwrap_or(0).max(0);
    let users = user::find_all(&state.pool, limit, offset).await?;
    Ok(Json(users))
}

/// GET /api/users/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let user = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id}")))?;
    Ok(Json(user))
}

/// POST /api/users - register a participant (default tier, zero
/// performance)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    let user = user::create(&state.pool, payload).await?;
    Ok(Json(user))
}

/// PATCH /api/users/:id/settings - admin commission settings update
///
/// Fields are independently optional; an explicit null clears a nullable
/// field.
pub async fn update_settings(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CommissionSettingsUpdate>,
) -> AppResult<Json<User>> {
    let user = state.engine.update_settings(id, payload).await?;
    Ok(Json(user))
}

/// GET /api/users/:id/commission - tier standing, promotion progress, team
/// stats
pub async fn commission_detail(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserCommissionDetail>> {
    let detail = state.engine.user_commission_detail(id).await?;
    Ok(Json(detail))
}

/// GET /api/users/:id/summary?year&month - ledger summary
pub async fn commission_summary(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<CommissionSummary>> {
    let summary =
        ledger::user_commission_summary(&state.pool, id, query.year, query.month).await?;
    Ok(Json(summary))
}
