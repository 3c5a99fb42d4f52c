//! Participant Repository

use super::{RepoError, RepoResult};
use shared::models::{User, UserCreate, UserRole};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteExecutor;

const USER_SELECT: &str = "SELECT id, name, email, role, tier, personal_commission_rate, manager_id, team_id, tier_override, current_month_sales, current_month_orders, current_month_new_customers, total_sales, total_orders, performance_reset_at, last_promotion_at, consecutive_months_in_tier, total_commission, is_active, created_at, updated_at FROM user";

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(user)
}

pub async fn find_all(
    ex: impl SqliteExecutor<'_>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} WHERE is_active = 1 ORDER BY created_at DESC LIMIT ? OFFSET ?");
    let users = sqlx::query_as::<_, User>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(ex)
        .await?;
    Ok(users)
}

/// All active participants, used by the monthly reset's tenure sweep
pub async fn find_all_active(ex: impl SqliteExecutor<'_>) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} WHERE is_active = 1");
    let users = sqlx::query_as::<_, User>(&sql).fetch_all(ex).await?;
    Ok(users)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let role = data.role.unwrap_or(UserRole::User);
    sqlx::query(
        "INSERT INTO user (id, name, email, role, tier, manager_id, team_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 'bronze', ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(role)
    .bind(data.manager_id)
    .bind(data.team_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Direct reports with a commission-earning role
pub async fn count_team_size(ex: impl SqliteExecutor<'_>, manager_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM user WHERE manager_id = ? AND role IN ('sale', 'staff') AND is_active = 1",
    )
    .bind(manager_id)
    .fetch_one(ex)
    .await?;
    Ok(count)
}

/// Current-month sales summed over direct reports.
///
/// The role filter is a policy choice: the team-size count always restricts
/// to commission-earning roles, the sales sum historically did not.
pub async fn sum_team_sales(
    ex: impl SqliteExecutor<'_>,
    manager_id: i64,
    include_all_roles: bool,
) -> RepoResult<i64> {
    let sql = if include_all_roles {
        "SELECT COALESCE(SUM(current_month_sales), 0) FROM user WHERE manager_id = ? AND is_active = 1"
    } else {
        "SELECT COALESCE(SUM(current_month_sales), 0) FROM user WHERE manager_id = ? AND role IN ('sale', 'staff') AND is_active = 1"
    };
    let sum: i64 = sqlx::query_scalar(sql).bind(manager_id).fetch_one(ex).await?;
    Ok(sum)
}

/// Atomically attribute a completed order to the owner's counters
pub async fn record_order_performance(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    amount: i64,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE user SET current_month_sales = current_month_sales + ?1, current_month_orders = current_month_orders + 1, total_sales = total_sales + ?1, total_orders = total_orders + 1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(amount)
    .bind(now)
    .bind(user_id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected())
}

/// Move a participant to a new tier, resetting tenure
pub async fn promote(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    tier: &str,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE user SET tier = ?1, last_promotion_at = ?2, consecutive_months_in_tier = 0, updated_at = ?2 WHERE id = ?3",
    )
    .bind(tier)
    .bind(now)
    .bind(user_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Credit a paid-out commission to the wallet balance
pub async fn add_commission_payout(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    amount: i64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE user SET total_commission = total_commission + ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(amount)
    .bind(now)
    .bind(user_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Write the commission settings block as merged by the engine
pub async fn update_settings(ex: impl SqliteExecutor<'_>, user: &User, now: i64) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE user SET tier = ?1, personal_commission_rate = ?2, manager_id = ?3, team_id = ?4, tier_override = ?5, updated_at = ?6 WHERE id = ?7",
    )
    .bind(&user.tier)
    .bind(user.personal_commission_rate)
    .bind(user.manager_id)
    .bind(user.team_id)
    .bind(user.tier_override)
    .bind(now)
    .bind(user.id)
    .execute(ex)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {} not found", user.id)));
    }
    Ok(())
}

/// Zero the rolling month counters for every participant
pub async fn reset_monthly_performance(ex: impl SqliteExecutor<'_>, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE user SET current_month_sales = 0, current_month_orders = 0, current_month_new_customers = 0, performance_reset_at = ?1, updated_at = ?1",
    )
    .bind(now)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected())
}

/// Count one more month of tenure for every active tiered participant
pub async fn accrue_tenure_all(ex: impl SqliteExecutor<'_>, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE user SET consecutive_months_in_tier = consecutive_months_in_tier + 1, updated_at = ?1 WHERE is_active = 1",
    )
    .bind(now)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn set_tenure(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    months: i64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE user SET consecutive_months_in_tier = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(months)
        .bind(now)
        .bind(user_id)
        .execute(ex)
        .await?;
    Ok(())
}
