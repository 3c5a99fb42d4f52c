//! Team API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{Team, TeamCreate};

use crate::core::ServerState;
use crate::db::repository::team;
use crate::utils::{AppError, AppResult};

/// GET /api/teams
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Team>>> {
    let teams = team::find_all(&state.pool).await?;
    Ok(Json(teams))
}

/// GET /api/teams/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Team>> {
    let team = team::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Team {id}")))?;
    Ok(Json(team))
}

/// POST /api/teams
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TeamCreate>,
) -> AppResult<Json<Team>> {
    let team = team::create(&state.pool, payload).await?;
    Ok(Json(team))
}
