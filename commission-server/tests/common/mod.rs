//! Shared helpers for the integration suites
#![allow(dead_code)]

use commission_server::db::repository::{transaction, user};
use commission_server::engine::{CommissionEngine, EnginePolicy};
use shared::models::{CommissionTransaction, CompletedOrder, User, UserCreate, UserRole};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Fresh in-memory database with migrations (and the seeded tier catalog)
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to apply migrations");
    pool
}

pub fn engine(pool: &SqlitePool) -> CommissionEngine {
    CommissionEngine::new(pool.clone(), EnginePolicy::default())
}

pub fn engine_with(pool: &SqlitePool, policy: EnginePolicy) -> CommissionEngine {
    CommissionEngine::new(pool.clone(), policy)
}

pub async fn create_user(pool: &SqlitePool, name: &str, role: UserRole) -> User {
    user::create(
        pool,
        UserCreate {
            name: name.to_string(),
            email: None,
            role: Some(role),
            manager_id: None,
            team_id: None,
        },
    )
    .await
    .expect("Failed to create user")
}

pub async fn set_manager(pool: &SqlitePool, user_id: i64, manager_id: Option<i64>) {
    sqlx::query("UPDATE user SET manager_id = ? WHERE id = ?")
        .bind(manager_id)
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn set_tier(pool: &SqlitePool, user_id: i64, tier: &str) {
    sqlx::query("UPDATE user SET tier = ? WHERE id = ?")
        .bind(tier)
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn set_team(pool: &SqlitePool, user_id: i64, team_id: i64) {
    sqlx::query("UPDATE user SET team_id = ? WHERE id = ?")
        .bind(team_id)
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn set_personal_rate(pool: &SqlitePool, user_id: i64, rate: Option<f64>) {
    sqlx::query("UPDATE user SET personal_commission_rate = ? WHERE id = ?")
        .bind(rate)
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn reload_user(pool: &SqlitePool, user_id: i64) -> User {
    user::find_by_id(pool, user_id).await.unwrap().unwrap()
}

pub fn order(id: i64, total_amount: i64, user_id: i64) -> CompletedOrder {
    CompletedOrder {
        id,
        order_number: format!("ORD-{id}"),
        total_amount,
        user_id,
        user_name: None,
        user_email: None,
    }
}

pub async fn transactions_for(pool: &SqlitePool, user_id: i64) -> Vec<CommissionTransaction> {
    transaction::find_recent(pool, user_id, 100).await.unwrap()
}
