//! Commission Calculator
//!
//! Derives zero or more ledger rows from one completed order: a direct-sale
//! commission for the owner, then override commissions walking up the
//! manager chain. Every pass uses the full order total as its base and the
//! live tier at calculation time; the applied rate and tier names are
//! snapshotted into the row as the audit record.

use std::collections::HashSet;

use sqlx::SqliteConnection;

use shared::models::{CommissionType, CompletedOrder, User};

use super::{CalcContext, EnginePolicy};
use crate::db::repository::transaction::TransactionCreate;
use crate::db::repository::{tier, transaction, user};
use crate::utils::AppResult;

/// Round a commission amount from an order total and a percentage rate
pub fn commission_amount(order_total: i64, rate: f64) -> i64 {
    (order_total as f64 * rate / 100.0).round() as i64
}

/// Ledger type for an override level. Levels past the configured per-level
/// rates have no type and end the walk.
fn override_type(level: usize) -> Option<CommissionType> {
    match level {
        1 => Some(CommissionType::TeamSaleL1),
        2 => Some(CommissionType::TeamSaleL2),
        _ => None,
    }
}

/// Run the direct-sale pass and the override walk for one order.
///
/// Returns the ids of the created rows. A missing participant or tier skips
/// the affected pass; only storage failures abort.
pub(crate) async fn run_passes(
    conn: &mut SqliteConnection,
    policy: &EnginePolicy,
    order: &CompletedOrder,
    ctx: &CalcContext,
) -> AppResult<Vec<i64>> {
    let mut created = Vec::new();

    let Some(owner) = user::find_by_id(&mut *conn, order.user_id).await? else {
        tracing::debug!(
            user_id = order.user_id,
            "order owner not found, skipping commission passes"
        );
        return Ok(created);
    };

    if let Some(id) = direct_sale_pass(&mut *conn, order, &owner, ctx).await? {
        created.push(id);
    }

    created.extend(override_walk(conn, policy, order, &owner, ctx).await?);

    Ok(created)
}

async fn direct_sale_pass(
    conn: &mut SqliteConnection,
    order: &CompletedOrder,
    owner: &User,
    ctx: &CalcContext,
) -> AppResult<Option<i64>> {
    if !owner.role.earns_commission() {
        return Ok(None);
    }
    let Some(owner_tier) = tier::find_active_by_name(&mut *conn, &owner.tier).await? else {
        tracing::debug!(
            user_id = owner.id,
            tier = %owner.tier,
            "tier missing or inactive, skipping direct-sale pass"
        );
        return Ok(None);
    };

    // Personal rate wins over the tier default
    let rate = owner
        .personal_commission_rate
        .unwrap_or(owner_tier.direct_sale_rate);
    let amount = commission_amount(order.total_amount, rate);
    if amount <= 0 {
        return Ok(None);
    }

    let id = transaction::create(
        &mut *conn,
        TransactionCreate {
            user_id: owner.id,
            order_id: Some(order.id),
            order_number: Some(order.order_number.clone()),
            order_total: Some(order.total_amount),
            commission_type: CommissionType::DirectSale,
            commission_rate: rate,
            commission_amount: amount,
            currency: ctx.currency.clone(),
            period_year: ctx.period_year,
            period_month: ctx.period_month,
            user_tier: Some(owner_tier.name),
            source_user_id: None,
            source_user_name: None,
            source_user_tier: None,
            team_id: None,
            notes: None,
        },
    )
    .await?;
    Ok(Some(id))
}

/// Walk the manager chain, crediting each eligible upline level with an
/// override on the full order total.
///
/// The source fields always carry the ORIGINAL order owner, never an
/// intermediate manager. An ineligible level keeps the walk going; a missing
/// manager or a cycle ends it.
async fn override_walk(
    conn: &mut SqliteConnection,
    policy: &EnginePolicy,
    order: &CompletedOrder,
    owner: &User,
    ctx: &CalcContext,
) -> AppResult<Vec<i64>> {
    let mut created = Vec::new();
    let mut visited = HashSet::from([owner.id]);
    let mut next_manager = owner.manager_id;

    for level in 1..=policy.max_override_depth {
        let Some(manager_id) = next_manager else { break };
        if !visited.insert(manager_id) {
            tracing::warn!(
                user_id = owner.id,
                manager_id,
                "manager chain cycle detected, ending override walk"
            );
            break;
        }
        let Some(manager) = user::find_by_id(&mut *conn, manager_id).await? else {
            tracing::debug!(manager_id, "upline manager not found, ending override walk");
            break;
        };
        next_manager = manager.manager_id;

        let Some(kind) = override_type(level) else { break };
        if !manager.role.earns_commission() {
            continue;
        }
        let Some(manager_tier) = tier::find_active_by_name(&mut *conn, &manager.tier).await? else {
            continue;
        };
        let Some(rate) = manager_tier.team_sale_rate(level).filter(|r| *r > 0.0) else {
            continue;
        };
        let amount = commission_amount(order.total_amount, rate);
        if amount <= 0 {
            continue;
        }

        let id = transaction::create(
            &mut *conn,
            TransactionCreate {
                user_id: manager.id,
                order_id: Some(order.id),
                order_number: Some(order.order_number.clone()),
                order_total: Some(order.total_amount),
                commission_type: kind,
                commission_rate: rate,
                commission_amount: amount,
                currency: ctx.currency.clone(),
                period_year: ctx.period_year,
                period_month: ctx.period_month,
                user_tier: Some(manager_tier.name),
                source_user_id: Some(owner.id),
                source_user_name: Some(owner.name.clone()),
                source_user_tier: Some(owner.tier.clone()),
                team_id: owner.team_id,
                notes: None,
            },
        )
        .await?;
        created.push(id);
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_amount_basic() {
        // 10% of 1,000,000
        assert_eq!(commission_amount(1_000_000, 10.0), 100_000);
    }

    #[test]
    fn test_commission_amount_rounds_half_up() {
        // 0.5% of 101 = 0.505 -> 1
        assert_eq!(commission_amount(101, 0.5), 1);
        // 0.4% of 100 = 0.4 -> 0
        assert_eq!(commission_amount(100, 0.4), 0);
    }

    #[test]
    fn test_commission_amount_zero_rate() {
        assert_eq!(commission_amount(1_000_000, 0.0), 0);
    }

    #[test]
    fn test_commission_amount_fractional_rate() {
        // 2.5% of 1,000,000
        assert_eq!(commission_amount(1_000_000, 2.5), 25_000);
    }

    #[test]
    fn test_override_type_levels() {
        assert_eq!(override_type(1), Some(CommissionType::TeamSaleL1));
        assert_eq!(override_type(2), Some(CommissionType::TeamSaleL2));
        assert_eq!(override_type(3), None);
    }
}
