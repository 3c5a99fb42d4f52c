//! Admin settings updates: independent optional fields, null clears,
//! validation at the boundary.

mod common;

use common::*;
use shared::models::{CommissionSettingsUpdate, UserRole};

#[tokio::test]
async fn test_update_each_field_independently() {
    let pool = setup_pool().await;
    let engine = engine(&pool);

    let manager = create_user(&pool, "Mara", UserRole::Sale).await;
    let team = commission_server::db::repository::team::create(
        &pool,
        shared::models::TeamCreate {
            name: "North".to_string(),
        },
    )
    .await
    .unwrap();
    let user = create_user(&pool, "Alice", UserRole::Sale).await;

    let updated = engine
        .update_settings(
            user.id,
            CommissionSettingsUpdate {
                tier: Some("gold".to_string()),
                personal_commission_rate: Some(Some(15.0)),
                manager_id: Some(Some(manager.id)),
                team_id: Some(Some(team.id)),
                tier_override: Some(true),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.tier, "gold");
    assert_eq!(updated.personal_commission_rate, Some(15.0));
    assert_eq!(updated.manager_id, Some(manager.id));
    assert_eq!(updated.team_id, Some(team.id));
    assert!(updated.tier_override);

    // An empty update leaves everything untouched
    let unchanged = engine
        .update_settings(user.id, CommissionSettingsUpdate::default())
        .await
        .unwrap();
    assert_eq!(unchanged.tier, "gold");
    assert_eq!(unchanged.manager_id, Some(manager.id));
}

#[tokio::test]
async fn test_explicit_null_clears_nullable_fields() {
    let pool = setup_pool().await;
    let engine = engine(&pool);

    let manager = create_user(&pool, "Mara", UserRole::Sale).await;
    let user = create_user(&pool, "Alice", UserRole::Sale).await;
    engine
        .update_settings(
            user.id,
            CommissionSettingsUpdate {
                personal_commission_rate: Some(Some(12.5)),
                manager_id: Some(Some(manager.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // The wire shape: {"personal_commission_rate": null, "manager_id": null}
    let clear: CommissionSettingsUpdate =
        serde_json::from_str(r#"{"personal_commission_rate": null, "manager_id": null}"#).unwrap();
    let updated = engine.update_settings(user.id, clear).await.unwrap();

    assert_eq!(updated.personal_commission_rate, None);
    assert_eq!(updated.manager_id, None);
}

#[tokio::test]
async fn test_rejects_out_of_range_rate() {
    let pool = setup_pool().await;
    let engine = engine(&pool);
    let user = create_user(&pool, "Alice", UserRole::Sale).await;

    let err = engine
        .update_settings(
            user.id,
            CommissionSettingsUpdate {
                personal_commission_rate: Some(Some(150.0)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, commission_server::AppError::Validation(_)));
}

#[tokio::test]
async fn test_rejects_unknown_tier_and_manager() {
    let pool = setup_pool().await;
    let engine = engine(&pool);
    let user = create_user(&pool, "Alice", UserRole::Sale).await;

    let err = engine
        .update_settings(
            user.id,
            CommissionSettingsUpdate {
                tier: Some("diamond".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, commission_server::AppError::Validation(_)));

    let err = engine
        .update_settings(
            user.id,
            CommissionSettingsUpdate {
                manager_id: Some(Some(424242)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, commission_server::AppError::Validation(_)));
}

#[tokio::test]
async fn test_rejects_self_management() {
    let pool = setup_pool().await;
    let engine = engine(&pool);
    let user = create_user(&pool, "Alice", UserRole::Sale).await;

    let err = engine
        .update_settings(
            user.id,
            CommissionSettingsUpdate {
                manager_id: Some(Some(user.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, commission_server::AppError::Validation(_)));
}
