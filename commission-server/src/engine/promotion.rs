//! Promotion Evaluator
//!
//! Single-step tier advancement along the catalog order. All requirement
//! dimensions are AND-combined; an absent or zero requirement is trivially
//! satisfied. No demotion path exists, so a participant's tier order never
//! decreases.

use sqlx::SqliteConnection;

use shared::models::{
    CommissionTier, CommissionType, PromotionProgress, RequirementProgress, User,
};

use super::{CalcContext, EnginePolicy};
use crate::db::repository::transaction::TransactionCreate;
use crate::db::repository::{tier, transaction, user};
use crate::utils::AppResult;

/// Measured standing for requirement evaluation
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirementStats {
    pub monthly_sales: i64,
    pub monthly_orders: i64,
    pub team_size: i64,
    pub team_sales: i64,
    pub months_in_tier: i64,
}

/// The four month-scoped requirement dimensions
pub fn month_requirements_met(tier: &CommissionTier, stats: &RequirementStats) -> bool {
    stats.monthly_sales >= tier.min_monthly_sales
        && stats.monthly_orders >= tier.min_monthly_orders
        && stats.team_size >= tier.min_team_size
        && stats.team_sales >= tier.min_team_sales
}

/// Full promotion gate: month dimensions plus the tenure requirement.
///
/// A tier demanding `consecutive_months` N admits a candidate with N-1
/// completed reset cycles; the qualifying month itself is the Nth.
pub fn requirements_met(tier: &CommissionTier, stats: &RequirementStats) -> bool {
    month_requirements_met(tier, stats)
        && (tier.consecutive_months <= 1 || stats.months_in_tier >= tier.consecutive_months - 1)
}

/// Per-dimension progress toward a tier's requirements
pub fn progress(tier: &CommissionTier, stats: &RequirementStats) -> PromotionProgress {
    PromotionProgress {
        sales: RequirementProgress::new(stats.monthly_sales, tier.min_monthly_sales),
        orders: RequirementProgress::new(stats.monthly_orders, tier.min_monthly_orders),
        team_size: RequirementProgress::new(stats.team_size, tier.min_team_size),
        team_sales: RequirementProgress::new(stats.team_sales, tier.min_team_sales),
    }
}

/// Measure a participant's standing from their counters and direct reports
pub(crate) async fn measure(
    conn: &mut SqliteConnection,
    policy: &EnginePolicy,
    user: &User,
) -> AppResult<RequirementStats> {
    let team_size = user::count_team_size(&mut *conn, user.id).await?;
    let team_sales =
        user::sum_team_sales(&mut *conn, user.id, policy.team_sales_includes_all_roles).await?;
    Ok(RequirementStats {
        monthly_sales: user.current_month_sales,
        monthly_orders: user.current_month_orders,
        team_size,
        team_sales,
        months_in_tier: user.consecutive_months_in_tier,
    })
}

/// Check the order owner against the next tier and promote one step when
/// every requirement passes.
///
/// Re-reads the participant so the just-applied performance increments are
/// visible. A participant qualifying for two tiers is promoted one level
/// here; the next order event promotes again.
pub(crate) async fn evaluate(
    conn: &mut SqliteConnection,
    policy: &EnginePolicy,
    user_id: i64,
    ctx: &CalcContext,
) -> AppResult<Option<String>> {
    let Some(user) = user::find_by_id(&mut *conn, user_id).await? else {
        return Ok(None);
    };
    if user.tier_override {
        // Admin pinned the tier
        return Ok(None);
    }
    let Some(current) = tier::find_by_name(&mut *conn, &user.tier).await? else {
        tracing::debug!(
            user_id,
            tier = %user.tier,
            "current tier not in catalog, skipping promotion check"
        );
        return Ok(None);
    };
    let Some(next) = tier::find_next(&mut *conn, current.tier_order).await? else {
        // At the ceiling
        return Ok(None);
    };

    let stats = measure(&mut *conn, policy, &user).await?;
    if !requirements_met(&next, &stats) {
        return Ok(None);
    }

    user::promote(&mut *conn, user.id, &next.name, ctx.now).await?;

    if let Some(bonus) = next.monthly_bonus.filter(|b| *b > 0) {
        transaction::create(
            &mut *conn,
            TransactionCreate {
                user_id: user.id,
                order_id: None,
                order_number: None,
                order_total: None,
                commission_type: CommissionType::KpiBonus,
                commission_rate: 0.0,
                commission_amount: bonus,
                currency: ctx.currency.clone(),
                period_year: ctx.period_year,
                period_month: ctx.period_month,
                user_tier: Some(next.name.clone()),
                source_user_id: None,
                source_user_name: None,
                source_user_tier: None,
                team_id: user.team_id,
                notes: Some(format!("Promotion bonus for reaching {}", next.display_name)),
            },
        )
        .await?;
    }

    tracing::info!(user_id, from = %current.name, to = %next.name, "participant promoted");
    Ok(Some(next.name))
}
