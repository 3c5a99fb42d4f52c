//! Approval Ledger
//!
//! Admin payout workflow over persisted transactions, separate from the
//! calculation path. Transitions are guarded by the expected source status,
//! so re-submitting a partially processed batch transitions zero additional
//! rows instead of erroring.

use chrono::{Datelike, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use shared::models::{CommissionSummary, PayTransactions, ReviewTransactions, TransactionStatus};

use crate::db::repository::{transaction, user};
use crate::utils::{AppError, AppResult};

/// pending -> approved
pub async fn approve_transactions(pool: &SqlitePool, req: &ReviewTransactions) -> AppResult<u64> {
    let now = shared::util::now_millis();
    let modified = transaction::review(
        pool,
        &req.ids,
        TransactionStatus::Pending,
        TransactionStatus::Approved,
        &req.approved_by,
        req.notes.as_deref(),
        now,
    )
    .await?;
    tracing::info!(
        requested = req.ids.len(),
        modified,
        approver = %req.approved_by,
        "transactions approved"
    );
    Ok(modified)
}

/// pending -> rejected (terminal)
pub async fn reject_transactions(pool: &SqlitePool, req: &ReviewTransactions) -> AppResult<u64> {
    let now = shared::util::now_millis();
    let modified = transaction::review(
        pool,
        &req.ids,
        TransactionStatus::Pending,
        TransactionStatus::Rejected,
        &req.approved_by,
        req.notes.as_deref(),
        now,
    )
    .await?;
    tracing::info!(
        requested = req.ids.len(),
        modified,
        approver = %req.approved_by,
        "transactions rejected"
    );
    Ok(modified)
}

/// approved -> paid, crediting each beneficiary's wallet.
///
/// Wallet credits follow exactly the rows that actually transitioned, one
/// row at a time, inside a single database transaction so a failed batch
/// cannot leave wallets half-credited.
pub async fn mark_as_paid(pool: &SqlitePool, req: &PayTransactions) -> AppResult<u64> {
    let batch = req
        .payment_batch
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;
    let mut modified = 0u64;
    for &id in &req.ids {
        let Some(row) = transaction::find_by_id(&mut *tx, id).await? else {
            continue;
        };
        let n = transaction::mark_paid(
            &mut *tx,
            id,
            &req.payment_method,
            req.payment_reference.as_deref(),
            &batch,
            now,
        )
        .await?;
        if n > 0 {
            user::add_commission_payout(&mut *tx, row.user_id, row.commission_amount, now).await?;
            modified += 1;
        }
    }
    tx.commit().await?;

    tracing::info!(
        requested = req.ids.len(),
        modified,
        batch = %batch,
        "transactions paid"
    );
    Ok(modified)
}

/// All-time status sums, one period's earnings, and the 20 most recent rows.
/// The period defaults to the current year/month.
pub async fn user_commission_summary(
    pool: &SqlitePool,
    user_id: i64,
    year: Option<i64>,
    month: Option<i64>,
) -> AppResult<CommissionSummary> {
    if user::find_by_id(pool, user_id).await?.is_none() {
        return Err(AppError::not_found(format!("User {user_id}")));
    }

    let today = Utc::now();
    let year = year.unwrap_or(today.year() as i64);
    let month = month.unwrap_or(today.month() as i64);

    let totals = transaction::sum_by_status(pool, user_id).await?;
    let period_total = transaction::sum_for_period(pool, user_id, year, month).await?;
    let recent = transaction::find_recent(pool, user_id, 20).await?;

    Ok(CommissionSummary {
        user_id,
        total_pending: totals.pending,
        total_approved: totals.approved,
        total_paid: totals.paid,
        period_year: year,
        period_month: month,
        period_total,
        recent,
    })
}
