//! Commission Tier Repository

use super::{RepoError, RepoResult};
use shared::models::{CommissionTier, TierCreate, TierUpdate};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteExecutor;

const TIER_SELECT: &str = "SELECT id, name, display_name, tier_order, is_active, direct_sale_rate, team_sale_l1_rate, team_sale_l2_rate, min_monthly_sales, min_monthly_orders, min_team_size, min_team_sales, consecutive_months, monthly_bonus, created_at, updated_at FROM commission_tier";

fn validate_rate(rate: f64, field_name: &str) -> RepoResult<()> {
    if !(0.0..=100.0).contains(&rate) {
        return Err(RepoError::Validation(format!(
            "{field_name} must be between 0 and 100: {rate}"
        )));
    }
    Ok(())
}

fn validate_create(data: &TierCreate) -> RepoResult<()> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("Tier name cannot be empty".into()));
    }
    if data.tier_order <= 0 {
        return Err(RepoError::Validation(format!(
            "Tier order must be positive: {}",
            data.tier_order
        )));
    }
    validate_rate(data.direct_sale_rate, "direct_sale_rate")?;
    if let Some(rate) = data.team_sale_l1_rate {
        validate_rate(rate, "team_sale_l1_rate")?;
    }
    if let Some(rate) = data.team_sale_l2_rate {
        validate_rate(rate, "team_sale_l2_rate")?;
    }
    Ok(())
}

pub async fn find_all(ex: impl SqliteExecutor<'_>) -> RepoResult<Vec<CommissionTier>> {
    let sql = format!("{TIER_SELECT} ORDER BY tier_order ASC");
    let tiers = sqlx::query_as::<_, CommissionTier>(&sql).fetch_all(ex).await?;
    Ok(tiers)
}

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<CommissionTier>> {
    let sql = format!("{TIER_SELECT} WHERE id = ?");
    let tier = sqlx::query_as::<_, CommissionTier>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(tier)
}

pub async fn find_by_name(
    ex: impl SqliteExecutor<'_>,
    name: &str,
) -> RepoResult<Option<CommissionTier>> {
    let sql = format!("{TIER_SELECT} WHERE name = ?");
    let tier = sqlx::query_as::<_, CommissionTier>(&sql)
        .bind(name)
        .fetch_optional(ex)
        .await?;
    Ok(tier)
}

/// Active tier by name; rate resolution goes through this so an inactive
/// tier earns nothing
pub async fn find_active_by_name(
    ex: impl SqliteExecutor<'_>,
    name: &str,
) -> RepoResult<Option<CommissionTier>> {
    let sql = format!("{TIER_SELECT} WHERE name = ? AND is_active = 1");
    let tier = sqlx::query_as::<_, CommissionTier>(&sql)
        .bind(name)
        .fetch_optional(ex)
        .await?;
    Ok(tier)
}

/// Next tier in the promotion sequence: lowest-order active tier strictly
/// above the given order
pub async fn find_next(
    ex: impl SqliteExecutor<'_>,
    tier_order: i64,
) -> RepoResult<Option<CommissionTier>> {
    let sql = format!(
        "{TIER_SELECT} WHERE is_active = 1 AND tier_order > ? ORDER BY tier_order ASC LIMIT 1"
    );
    let tier = sqlx::query_as::<_, CommissionTier>(&sql)
        .bind(tier_order)
        .fetch_optional(ex)
        .await?;
    Ok(tier)
}

pub async fn create(pool: &SqlitePool, data: TierCreate) -> RepoResult<CommissionTier> {
    validate_create(&data)?;

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO commission_tier (id, name, display_name, tier_order, direct_sale_rate, team_sale_l1_rate, team_sale_l2_rate, min_monthly_sales, min_monthly_orders, min_team_size, min_team_sales, consecutive_months, monthly_bonus, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.display_name)
    .bind(data.tier_order)
    .bind(data.direct_sale_rate)
    .bind(data.team_sale_l1_rate.unwrap_or(0.0))
    .bind(data.team_sale_l2_rate)
    .bind(data.min_monthly_sales.unwrap_or(0))
    .bind(data.min_monthly_orders.unwrap_or(0))
    .bind(data.min_team_size.unwrap_or(0))
    .bind(data.min_team_sales.unwrap_or(0))
    .bind(data.consecutive_months.unwrap_or(0))
    .bind(data.monthly_bonus)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create tier".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: TierUpdate) -> RepoResult<CommissionTier> {
    if let Some(rate) = data.direct_sale_rate {
        validate_rate(rate, "direct_sale_rate")?;
    }
    if let Some(rate) = data.team_sale_l1_rate {
        validate_rate(rate, "team_sale_l1_rate")?;
    }
    if let Some(Some(rate)) = data.team_sale_l2_rate {
        validate_rate(rate, "team_sale_l2_rate")?;
    }
    if let Some(order) = data.tier_order {
        if order <= 0 {
            return Err(RepoError::Validation(format!(
                "Tier order must be positive: {order}"
            )));
        }
    }

    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Tier {id} not found")))?;

    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE commission_tier SET display_name = ?1, tier_order = ?2, is_active = ?3, direct_sale_rate = ?4, team_sale_l1_rate = ?5, team_sale_l2_rate = ?6, min_monthly_sales = ?7, min_monthly_orders = ?8, min_team_size = ?9, min_team_sales = ?10, consecutive_months = ?11, monthly_bonus = ?12, updated_at = ?13 WHERE id = ?14",
    )
    .bind(data.display_name.unwrap_or(current.display_name))
    .bind(data.tier_order.unwrap_or(current.tier_order))
    .bind(data.is_active.unwrap_or(current.is_active))
    .bind(data.direct_sale_rate.unwrap_or(current.direct_sale_rate))
    .bind(data.team_sale_l1_rate.unwrap_or(current.team_sale_l1_rate))
    .bind(data.team_sale_l2_rate.unwrap_or(current.team_sale_l2_rate))
    .bind(data.min_monthly_sales.unwrap_or(current.min_monthly_sales))
    .bind(data.min_monthly_orders.unwrap_or(current.min_monthly_orders))
    .bind(data.min_team_size.unwrap_or(current.min_team_size))
    .bind(data.min_team_sales.unwrap_or(current.min_team_sales))
    .bind(data.consecutive_months.unwrap_or(current.consecutive_months))
    .bind(data.monthly_bonus.unwrap_or(current.monthly_bonus))
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Tier {id} not found")))
}

/// Soft delete: deactivated tiers stop matching rate lookups and the
/// promotion sequence
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE commission_tier SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
