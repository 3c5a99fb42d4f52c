//! Commission Transaction Repository
//!
//! Append-only ledger rows. Creation happens inside the calculation's unit
//! of work; status moves only through the guarded transitions below, so a
//! re-submitted batch touches zero additional rows.

use super::{RepoError, RepoResult};
use shared::models::{CommissionTransaction, CommissionType, TransactionStatus};
use sqlx::sqlite::SqliteExecutor;

const TX_SELECT: &str = "SELECT id, user_id, order_id, order_number, order_total, commission_type, commission_rate, commission_amount, currency, period_year, period_month, status, user_tier, source_user_id, source_user_name, source_user_tier, team_id, approved_by, approved_at, paid_at, payment_method, payment_reference, payment_batch, notes, created_at, updated_at FROM commission_transaction";

/// New ledger row as built by the calculator / promotion evaluator
#[derive(Debug, Clone)]
pub struct TransactionCreate {
    pub user_id: i64,
    pub order_id: Option<i64>,
    pub order_number: Option<String>,
    pub order_total: Option<i64>,
    pub commission_type: CommissionType,
    pub commission_rate: f64,
    pub commission_amount: i64,
    pub currency: String,
    pub period_year: i64,
    pub period_month: i64,
    pub user_tier: Option<String>,
    pub source_user_id: Option<i64>,
    pub source_user_name: Option<String>,
    pub source_user_tier: Option<String>,
    pub team_id: Option<i64>,
    pub notes: Option<String>,
}

/// Listing filters; absent fields match everything
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub status: Option<TransactionStatus>,
    pub user_id: Option<i64>,
    pub period_year: Option<i64>,
    pub period_month: Option<i64>,
}

/// All-time sums per status for one participant
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusTotals {
    pub pending: i64,
    pub approved: i64,
    pub paid: i64,
}

pub async fn create(ex: impl SqliteExecutor<'_>, data: TransactionCreate) -> RepoResult<i64> {
    if data.commission_amount <= 0 {
        return Err(RepoError::Validation(format!(
            "Commission amount must be positive: {}",
            data.commission_amount
        )));
    }
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO commission_transaction (id, user_id, order_id, order_number, order_total, commission_type, commission_rate, commission_amount, currency, period_year, period_month, status, user_tier, source_user_id, source_user_name, source_user_tier, team_id, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 'pending', ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?18)",
    )
    .bind(id)
    .bind(data.user_id)
    .bind(data.order_id)
    .bind(&data.order_number)
    .bind(data.order_total)
    .bind(data.commission_type)
    .bind(data.commission_rate)
    .bind(data.commission_amount)
    .bind(&data.currency)
    .bind(data.period_year)
    .bind(data.period_month)
    .bind(&data.user_tier)
    .bind(data.source_user_id)
    .bind(&data.source_user_name)
    .bind(&data.source_user_tier)
    .bind(data.team_id)
    .bind(&data.notes)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(id)
}

pub async fn find_by_id(
    ex: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<CommissionTransaction>> {
    let sql = format!("{TX_SELECT} WHERE id = ?");
    let tx = sqlx::query_as::<_, CommissionTransaction>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(tx)
}

pub async fn find_all(
    ex: impl SqliteExecutor<'_>,
    filter: &TransactionFilter,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<CommissionTransaction>> {
    let sql = format!(
        "{TX_SELECT} WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR user_id = ?2) AND (?3 IS NULL OR period_year = ?3) AND (?4 IS NULL OR period_month = ?4) ORDER BY created_at DESC LIMIT ?5 OFFSET ?6"
    );
    let txs = sqlx::query_as::<_, CommissionTransaction>(&sql)
        .bind(filter.status)
        .bind(filter.user_id)
        .bind(filter.period_year)
        .bind(filter.period_month)
        .bind(limit)
        .bind(offset)
        .fetch_all(ex)
        .await?;
    Ok(txs)
}

/// Guarded bulk status transition (pending -> approved / rejected).
///
/// Rows not in the expected source status are left untouched; the returned
/// count is the number actually modified.
pub async fn review(
    ex: impl SqliteExecutor<'_>,
    ids: &[i64],
    from: TransactionStatus,
    to: TransactionStatus,
    reviewer: &str,
    notes: Option<&str>,
    now: i64,
) -> RepoResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "UPDATE commission_transaction SET status = ?, approved_by = ?, approved_at = ?, notes = COALESCE(?, notes), updated_at = ? WHERE status = ? AND id IN ({placeholders})"
    );
    let mut query = sqlx::query(&sql)
        .bind(to)
        .bind(reviewer)
        .bind(now)
        .bind(notes)
        .bind(now)
        .bind(from);
    for &id in ids {
        query = query.bind(id);
    }
    let rows = query.execute(ex).await?;
    Ok(rows.rows_affected())
}

/// Guarded single-row transition approved -> paid
pub async fn mark_paid(
    ex: impl SqliteExecutor<'_>,
    id: i64,
    payment_method: &str,
    payment_reference: Option<&str>,
    payment_batch: &str,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE commission_transaction SET status = 'paid', paid_at = ?1, payment_method = ?2, payment_reference = ?3, payment_batch = ?4, updated_at = ?1 WHERE id = ?5 AND status = 'approved'",
    )
    .bind(now)
    .bind(payment_method)
    .bind(payment_reference)
    .bind(payment_batch)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn sum_by_status(ex: impl SqliteExecutor<'_>, user_id: i64) -> RepoResult<StatusTotals> {
    let rows: Vec<(TransactionStatus, i64)> = sqlx::query_as(
        "SELECT status, COALESCE(SUM(commission_amount), 0) FROM commission_transaction WHERE user_id = ? GROUP BY status",
    )
    .bind(user_id)
    .fetch_all(ex)
    .await?;

    let mut totals = StatusTotals::default();
    for (status, sum) in rows {
        match status {
            TransactionStatus::Pending => totals.pending = sum,
            TransactionStatus::Approved => totals.approved = sum,
            TransactionStatus::Paid => totals.paid = sum,
            TransactionStatus::Rejected => {}
        }
    }
    Ok(totals)
}

/// Sum of one period's earnings, rejected rows excluded
pub async fn sum_for_period(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    year: i64,
    month: i64,
) -> RepoResult<i64> {
    let sum: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(commission_amount), 0) FROM commission_transaction WHERE user_id = ? AND period_year = ? AND period_month = ? AND status != 'rejected'",
    )
    .bind(user_id)
    .bind(year)
    .bind(month)
    .fetch_one(ex)
    .await?;
    Ok(sum)
}

pub async fn find_recent(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    limit: i64,
) -> RepoResult<Vec<CommissionTransaction>> {
    let sql = format!("{TX_SELECT} WHERE user_id = ? ORDER BY created_at DESC LIMIT ?");
    let txs = sqlx::query_as::<_, CommissionTransaction>(&sql)
        .bind(user_id)
        .bind(limit)
        .fetch_all(ex)
        .await?;
    Ok(txs)
}
