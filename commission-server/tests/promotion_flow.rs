//! Promotion flows: requirement gating, tier bonuses, single-step
//! advancement, admin-pinned tiers.

mod common;

use common::*;
use shared::models::{CommissionType, TransactionStatus, UserRole};

/// Leave only a sales requirement on the named tier so tests can steer the
/// promotion sequence precisely.
async fn simplify_tier_requirements(pool: &sqlx::SqlitePool, tier: &str, min_monthly_sales: i64) {
    sqlx::query(
        "UPDATE commission_tier SET min_monthly_sales = ?, min_monthly_orders = 0, min_team_size = 0, min_team_sales = 0, consecutive_months = 0 WHERE name = ?",
    )
    .bind(min_monthly_sales)
    .bind(tier)
    .execute(pool)
    .await
    .unwrap();
}

#[tokio::test]
async fn test_promotion_to_silver_with_bonus() {
    let pool = setup_pool().await;
    let engine = engine(&pool);

    let owner = create_user(&pool, "Alice", UserRole::Sale).await;
    let outcome = engine
        .calculate_commission(&order(1, 6_000_000, owner.id))
        .await
        .unwrap();

    // 6,000,000 current-month sales clears silver's 5,000,000 requirement
    assert_eq!(outcome.promoted_to.as_deref(), Some("silver"));

    let owner = reload_user(&pool, owner.id).await;
    assert_eq!(owner.tier, "silver");
    assert_eq!(owner.consecutive_months_in_tier, 0);
    assert!(owner.last_promotion_at.is_some());

    // Silver's 50,000 promotion bonus landed as a pending kpi_bonus row
    let txs = transactions_for(&pool, owner.id).await;
    let bonus = txs
        .iter()
        .find(|t| t.commission_type == CommissionType::KpiBonus)
        .expect("kpi bonus transaction");
    assert_eq!(bonus.commission_amount, 50_000);
    assert_eq!(bonus.commission_rate, 0.0);
    assert_eq!(bonus.status, TransactionStatus::Pending);
    assert_eq!(bonus.order_id, None);
}

#[tokio::test]
async fn test_direct_rate_resolved_before_promotion() {
    let pool = setup_pool().await;
    let engine = engine(&pool);

    let owner = create_user(&pool, "Alice", UserRole::Sale).await;
    engine
        .calculate_commission(&order(1, 6_000_000, owner.id))
        .await
        .unwrap();

    // The qualifying order itself is still paid at the pre-promotion rate
    let txs = transactions_for(&pool, owner.id).await;
    let direct = txs
        .iter()
        .find(|t| t.commission_type == CommissionType::DirectSale)
        .unwrap();
    assert_eq!(direct.commission_rate, 10.0);
    assert_eq!(direct.user_tier.as_deref(), Some("bronze"));
}

#[tokio::test]
async fn test_no_promotion_when_other_requirements_short() {
    let pool = setup_pool().await;
    let engine = engine(&pool);

    // Gold (seeded) requires 20 monthly orders, 3 sale/staff reports and
    // 50M team sales on top of 20M sales; sales alone must not promote
    let owner = create_user(&pool, "Alice", UserRole::Sale).await;
    set_tier(&pool, owner.id, "silver").await;

    let outcome = engine
        .calculate_commission(&order(1, 25_000_000, owner.id))
        .await
        .unwrap();

    assert_eq!(outcome.promoted_to, None);
    assert_eq!(reload_user(&pool, owner.id).await.tier, "silver");
}

#[tokio::test]
async fn test_promotion_is_single_step_per_order() {
    let pool = setup_pool().await;
    let engine = engine(&pool);
    simplify_tier_requirements(&pool, "gold", 5_000_000).await;

    let owner = create_user(&pool, "Alice", UserRole::Sale).await;
    // 6M clears both silver's and (simplified) gold's requirement, but one
    // order event promotes exactly one level
    let outcome = engine
        .calculate_commission(&order(1, 6_000_000, owner.id))
        .await
        .unwrap();
    assert_eq!(outcome.promoted_to.as_deref(), Some("silver"));
    assert_eq!(reload_user(&pool, owner.id).await.tier, "silver");

    // The next order re-evaluates and promotes again
    let outcome = engine
        .calculate_commission(&order(2, 1_000, owner.id))
        .await
        .unwrap();
    assert_eq!(outcome.promoted_to.as_deref(), Some("gold"));
    assert_eq!(reload_user(&pool, owner.id).await.tier, "gold");
}

#[tokio::test]
async fn test_consecutive_months_requirement_gates_promotion() {
    let pool = setup_pool().await;
    let engine = engine(&pool);
    simplify_tier_requirements(&pool, "gold", 5_000_000).await;
    sqlx::query("UPDATE commission_tier SET consecutive_months = 2 WHERE name = 'gold'")
        .execute(&pool)
        .await
        .unwrap();

    let owner = create_user(&pool, "Alice", UserRole::Sale).await;
    set_tier(&pool, owner.id, "silver").await;

    // Sales qualify but tenure is 0 of the required 1 completed cycle
    let outcome = engine
        .calculate_commission(&order(1, 6_000_000, owner.id))
        .await
        .unwrap();
    assert_eq!(outcome.promoted_to, None);

    sqlx::query("UPDATE user SET consecutive_months_in_tier = 1 WHERE id = ?")
        .bind(owner.id)
        .execute(&pool)
        .await
        .unwrap();

    let outcome = engine
        .calculate_commission(&order(2, 1_000, owner.id))
        .await
        .unwrap();
    assert_eq!(outcome.promoted_to.as_deref(), Some("gold"));
}

#[tokio::test]
async fn test_tier_override_pins_tier() {
    let pool = setup_pool().await;
    let engine = engine(&pool);

    let owner = create_user(&pool, "Alice", UserRole::Sale).await;
    sqlx::query("UPDATE user SET tier_override = 1 WHERE id = ?")
        .bind(owner.id)
        .execute(&pool)
        .await
        .unwrap();

    let outcome = engine
        .calculate_commission(&order(1, 10_000_000, owner.id))
        .await
        .unwrap();

    assert_eq!(outcome.promoted_to, None);
    let owner = reload_user(&pool, owner.id).await;
    assert_eq!(owner.tier, "bronze");
    // No bonus either
    assert!(
        !transactions_for(&pool, owner.id)
            .await
            .iter()
            .any(|t| t.commission_type == CommissionType::KpiBonus)
    );
}

#[tokio::test]
async fn test_no_promotion_at_ceiling() {
    let pool = setup_pool().await;
    let engine = engine(&pool);

    let owner = create_user(&pool, "Alice", UserRole::Sale).await;
    set_tier(&pool, owner.id, "platinum").await;

    let outcome = engine
        .calculate_commission(&order(1, 100_000_000, owner.id))
        .await
        .unwrap();

    assert_eq!(outcome.promoted_to, None);
    assert_eq!(reload_user(&pool, owner.id).await.tier, "platinum");
}

#[tokio::test]
async fn test_team_sales_role_filter_policy() {
    use commission_server::engine::EnginePolicy;

    let pool = setup_pool().await;

    let manager = create_user(&pool, "Mara", UserRole::Sale).await;
    let sale_report = create_user(&pool, "Sam", UserRole::Sale).await;
    set_manager(&pool, sale_report.id, Some(manager.id)).await;
    let customer_report = create_user(&pool, "Carl", UserRole::User).await;
    set_manager(&pool, customer_report.id, Some(manager.id)).await;

    sqlx::query("UPDATE user SET current_month_sales = ? WHERE id IN (?, ?)")
        .bind(3_000_000_i64)
        .bind(sale_report.id)
        .bind(customer_report.id)
        .execute(&pool)
        .await
        .unwrap();

    // Source behavior: every direct report counts toward team sales
    let all_roles = engine(&pool);
    let detail = all_roles.user_commission_detail(manager.id).await.unwrap();
    assert_eq!(detail.team_stats.team_sales, 6_000_000);
    // Team size always counts commission-earning roles only
    assert_eq!(detail.team_stats.team_size, 1);

    // Filtered interpretation: customer sales drop out
    let filtered = engine_with(
        &pool,
        EnginePolicy {
            team_sales_includes_all_roles: false,
            ..Default::default()
        },
    );
    let detail = filtered.user_commission_detail(manager.id).await.unwrap();
    assert_eq!(detail.team_stats.team_sales, 3_000_000);
}
