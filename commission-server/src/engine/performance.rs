//! Performance Tracker
//!
//! Rolling monthly counters per participant and team. Every completed order
//! counts toward performance, commission-eligible or not; the team mirror is
//! applied in lockstep with the owner's increments.

use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

use shared::models::CompletedOrder;

use super::{EnginePolicy, TenurePolicy, promotion};
use crate::db::repository::{team, tier, user};
use crate::utils::AppResult;

/// Counts from one monthly reset run
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResetOutcome {
    pub users_reset: u64,
    pub teams_reset: u64,
}

/// Attribute one completed order to the owner's counters and, when the
/// owner belongs to a team, to the team's counters.
pub(crate) async fn record_order(
    conn: &mut SqliteConnection,
    order: &CompletedOrder,
    now: i64,
) -> AppResult<()> {
    let Some(owner) = user::find_by_id(&mut *conn, order.user_id).await? else {
        tracing::debug!(
            user_id = order.user_id,
            "order owner not found, skipping performance update"
        );
        return Ok(());
    };

    user::record_order_performance(&mut *conn, owner.id, order.total_amount, now).await?;
    if let Some(team_id) = owner.team_id {
        team::record_order_performance(&mut *conn, team_id, order.total_amount, now).await?;
    }
    Ok(())
}

/// Zero all rolling counters and roll tenure forward per policy.
///
/// Tenure is decided against the closing month's counters, so the sweep
/// runs before the counters are zeroed. The whole reset is one database
/// transaction.
pub async fn monthly_reset(pool: &SqlitePool, policy: &EnginePolicy) -> AppResult<ResetOutcome> {
    let mut tx = pool.begin().await?;
    let now = shared::util::now_millis();

    match policy.tenure_policy {
        TenurePolicy::AlwaysAccrue => {
            user::accrue_tenure_all(&mut *tx, now).await?;
        }
        TenurePolicy::RequireRequirements => {
            let users = user::find_all_active(&mut *tx).await?;
            for u in users {
                let met = match tier::find_by_name(&mut *tx, &u.tier).await? {
                    Some(t) => {
                        let stats = promotion::measure(&mut tx, policy, &u).await?;
                        promotion::month_requirements_met(&t, &stats)
                    }
                    None => false,
                };
                let months = if met { u.consecutive_months_in_tier + 1 } else { 0 };
                user::set_tenure(&mut *tx, u.id, months, now).await?;
            }
        }
    }

    let users_reset = user::reset_monthly_performance(&mut *tx, now).await?;
    let teams_reset = team::reset_monthly_performance(&mut *tx, now).await?;

    tx.commit().await?;

    tracing::info!(users_reset, teams_reset, "monthly performance reset complete");
    Ok(ResetOutcome {
        users_reset,
        teams_reset,
    })
}
