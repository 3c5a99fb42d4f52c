//! Team Model

use serde::{Deserialize, Serialize};

/// Team entity
///
/// The performance block aggregates member counters and is updated in
/// lockstep with the member's own increments when an order is attributed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub current_month_sales: i64,
    pub current_month_orders: i64,
    pub current_month_new_members: i64,
    pub total_sales: i64,
    pub total_orders: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create team payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamCreate {
    pub name: String,
}
