//! Commission Views
//!
//! Read-only aggregation shapes returned by the detail and summary
//! endpoints.

use serde::{Deserialize, Serialize};

use super::tier::CommissionTier;
use super::transaction::CommissionTransaction;

/// Progress on one promotion requirement dimension
///
/// `percentage = min(100, current / required * 100)` when `required > 0`,
/// else 100 (trivially satisfied).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementProgress {
    pub current: i64,
    pub required: i64,
    pub percentage: f64,
}

impl RequirementProgress {
    pub fn new(current: i64, required: i64) -> Self {
        let percentage = if required > 0 {
            (current as f64 / required as f64 * 100.0).min(100.0)
        } else {
            100.0
        };
        Self {
            current,
            required,
            percentage,
        }
    }
}

/// Per-dimension progress toward the next tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionProgress {
    pub sales: RequirementProgress,
    pub orders: RequirementProgress,
    pub team_size: RequirementProgress,
    pub team_sales: RequirementProgress,
}

/// Direct-report stats for a participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStats {
    /// Direct reports with a commission-earning role
    pub team_size: i64,
    /// Current-month sales summed over direct reports
    pub team_sales: i64,
}

/// Commission detail view for one participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCommissionDetail {
    pub user_id: i64,
    pub name: String,
    pub tier: Option<CommissionTier>,
    pub next_tier: Option<CommissionTier>,
    /// Progress toward `next_tier`; None when at the ceiling
    pub progress: Option<PromotionProgress>,
    pub team_stats: TeamStats,
    /// Sum of this period's transactions, any status
    pub period_earnings: i64,
    /// Wallet balance of paid-out commission
    pub total_commission: i64,
}

/// Ledger summary for one participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionSummary {
    pub user_id: i64,
    /// All-time sums by status
    pub total_pending: i64,
    pub total_approved: i64,
    pub total_paid: i64,
    /// Selected period (defaults to the current year/month)
    pub period_year: i64,
    pub period_month: i64,
    pub period_total: i64,
    /// 20 most recent transactions
    pub recent: Vec<CommissionTransaction>,
}

/// Result of one order's commission calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationOutcome {
    pub order_id: i64,
    /// Rows created by the commission passes (a promotion bonus is reported
    /// via `promoted_to`, not counted here)
    pub transactions_created: usize,
    /// Tier name the owner was promoted to, when promotion fired
    pub promoted_to: Option<String>,
}
