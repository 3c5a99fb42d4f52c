//! Participant Model

use serde::{Deserialize, Serialize};

/// Participant role
///
/// Only `sale` and `staff` earn commissions; every role still counts toward
/// performance when their orders complete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum UserRole {
    User,
    Sale,
    Staff,
    Admin,
}

impl UserRole {
    /// Whether this role participates in commission payouts
    pub fn earns_commission(&self) -> bool {
        matches!(self, UserRole::Sale | UserRole::Staff)
    }
}

/// Participant entity
///
/// Commission settings and the performance block are flattened into the row.
/// Counters are mutated only through the performance tracker's atomic
/// increments; tier and promotion bookkeeping only by the promotion
/// evaluator or an admin settings update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub role: UserRole,
    // Commission settings
    pub tier: String,
    pub personal_commission_rate: Option<f64>,
    pub manager_id: Option<i64>,
    pub team_id: Option<i64>,
    /// Admin pinned the tier; automatic promotion is suspended while set
    pub tier_override: bool,
    // Performance (rolling month + lifetime)
    pub current_month_sales: i64,
    pub current_month_orders: i64,
    pub current_month_new_customers: i64,
    pub total_sales: i64,
    pub total_orders: i64,
    pub performance_reset_at: Option<i64>,
    // Promotion bookkeeping
    pub last_promotion_at: Option<i64>,
    pub consecutive_months_in_tier: i64,
    /// Wallet balance of paid-out commission
    pub total_commission: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create participant payload
///
/// New participants start at the default tier with zero performance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub manager_id: Option<i64>,
    pub team_id: Option<i64>,
}

/// Commission settings update payload (admin)
///
/// Every field is independently optional; nullable fields use the
/// double-Option encoding so an explicit `null` clears the column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommissionSettingsUpdate {
    pub tier: Option<String>,
    #[serde(default, deserialize_with = "super::serde_helpers::double_option")]
    pub personal_commission_rate: Option<Option<f64>>,
    #[serde(default, deserialize_with = "super::serde_helpers::double_option")]
    pub manager_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "super::serde_helpers::double_option")]
    pub team_id: Option<Option<i64>>,
    pub tier_override: Option<bool>,
}
