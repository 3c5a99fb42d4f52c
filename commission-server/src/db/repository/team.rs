//! Team Repository

use super::{RepoError, RepoResult};
use shared::models::{Team, TeamCreate};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteExecutor;

const TEAM_SELECT: &str = "SELECT id, name, current_month_sales, current_month_orders, current_month_new_members, total_sales, total_orders, is_active, created_at, updated_at FROM team";

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Team>> {
    let sql = format!("{TEAM_SELECT} WHERE id = ?");
    let team = sqlx::query_as::<_, Team>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(team)
}

pub async fn find_all(ex: impl SqliteExecutor<'_>) -> RepoResult<Vec<Team>> {
    let sql = format!("{TEAM_SELECT} WHERE is_active = 1 ORDER BY created_at DESC");
    let teams = sqlx::query_as::<_, Team>(&sql).fetch_all(ex).await?;
    Ok(teams)
}

pub async fn create(pool: &SqlitePool, data: TeamCreate) -> RepoResult<Team> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("Team name cannot be empty".into()));
    }
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query("INSERT INTO team (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)")
        .bind(id)
        .bind(&data.name)
        .bind(now)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create team".into()))
}

/// Atomically mirror a member's order into the team counters
pub async fn record_order_performance(
    ex: impl SqliteExecutor<'_>,
    team_id: i64,
    amount: i64,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE team SET current_month_sales = current_month_sales + ?1, current_month_orders = current_month_orders + 1, total_sales = total_sales + ?1, total_orders = total_orders + 1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(amount)
    .bind(now)
    .bind(team_id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected())
}

/// Zero the rolling month counters for every team
pub async fn reset_monthly_performance(ex: impl SqliteExecutor<'_>, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE team SET current_month_sales = 0, current_month_orders = 0, current_month_new_members = 0, updated_at = ?1",
    )
    .bind(now)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected())
}
