//! Commission Transaction Model

use serde::{Deserialize, Serialize};

/// Kind of commission a ledger row represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum CommissionType {
    DirectSale,
    TeamSaleL1,
    TeamSaleL2,
    KpiBonus,
}

/// Ledger row status
///
/// Transitions only move forward: pending -> approved -> paid, or
/// pending -> rejected (terminal).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TransactionStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

/// Commission transaction (append-only ledger row)
///
/// Immutable once created apart from status and the matching audit fields.
/// `commission_amount` is always `round(order_total * commission_rate / 100)`
/// and strictly positive; zero-value commissions are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CommissionTransaction {
    pub id: i64,
    /// Beneficiary
    pub user_id: i64,
    pub order_id: Option<i64>,
    pub order_number: Option<String>,
    pub order_total: Option<i64>,
    pub commission_type: CommissionType,
    pub commission_rate: f64,
    pub commission_amount: i64,
    pub currency: String,
    /// Calendar month the order was attributed to
    pub period_year: i64,
    pub period_month: i64,
    pub status: TransactionStatus,
    /// Beneficiary's tier at calculation time
    pub user_tier: Option<String>,
    /// Original order owner for override commissions (never an intermediate
    /// manager)
    pub source_user_id: Option<i64>,
    pub source_user_name: Option<String>,
    pub source_user_tier: Option<String>,
    pub team_id: Option<i64>,
    // Approval / payment audit
    pub approved_by: Option<String>,
    pub approved_at: Option<i64>,
    pub paid_at: Option<i64>,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub payment_batch: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Bulk approve / reject payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewTransactions {
    pub ids: Vec<i64>,
    pub approved_by: String,
    pub notes: Option<String>,
}

/// Bulk mark-paid payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayTransactions {
    pub ids: Vec<i64>,
    pub payment_method: String,
    pub payment_reference: Option<String>,
    /// Batch label; generated when absent
    pub payment_batch: Option<String>,
}
