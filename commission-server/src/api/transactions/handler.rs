//! Transaction API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use shared::models::{
    CommissionTransaction, PayTransactions, ReviewTransactions, TransactionStatus,
};

use crate::core::ServerState;
use crate::db::repository::transaction::{self, TransactionFilter};
use crate::engine::ledger;
use crate::utils::{AppError, AppResult};

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub status: Option<TransactionStatus>,
    pub user_id: Option<i64>,
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Count of rows a bulk action actually transitioned
#[derive(serde::Serialize)]
pub struct ModifiedCount {
    pub modified: u64,
}

/// GET /api/transactions - list ledger rows with optional filters
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<CommissionTransaction>>> {
    let filter = TransactionFilter {
        status: query.status,
        user_id: query.user_id,
        period_year: query.year,
        period_month: query.month,
    };
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let offset = query.offset.unwrap_or(0).max(0);

    let txs = transaction::find_all(&state.pool, &filter, limit, offset).await?;
    Ok(Json(txs))
}

/// GET /api/transactions/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CommissionTransaction>> {
    let tx = transaction::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Transaction {id}")))?;
    Ok(Json(tx))
}

/// POST /api/transactions/approve - bulk pending -> approved
pub async fn approve(
    State(state): State<ServerState>,
    Json(payload): Json<ReviewTransactions>,
) -> AppResult<Json<ModifiedCount>> {
    let modified = ledger::approve_transactions(&state.pool, &payload).await?;
    Ok(Json(ModifiedCount { modified }))
}

/// POST /api/transactions/reject - bulk pending -> rejected
pub async fn reject(
    State(state): State<ServerState>,
    Json(payload): Json<ReviewTransactions>,
) -> AppResult<Json<ModifiedCount>> {
    let modified = ledger::reject_transactions(&state.pool, &payload).await?;
    Ok(Json(ModifiedCount { modified }))
}

/// POST /api/transactions/pay - bulk approved -> paid, crediting wallets
pub async fn pay(
    State(state): State<ServerState>,
    Json(payload): Json<PayTransactions>,
) -> AppResult<Json<ModifiedCount>> {
    let modified = ledger::mark_as_paid(&state.pool, &payload).await?;
    Ok(Json(ModifiedCount { modified }))
}
