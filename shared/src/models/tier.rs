//! Commission Tier Model

use serde::{Deserialize, Serialize};

/// Commission tier catalog entry
///
/// Tiers form a total order by `tier_order`. The "next tier" for a
/// participant is the lowest-order active tier strictly above their current
/// tier's order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CommissionTier {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub tier_order: i64,
    pub is_active: bool,
    // Rates (percentages)
    pub direct_sale_rate: f64,
    pub team_sale_l1_rate: f64,
    pub team_sale_l2_rate: Option<f64>,
    // Promotion requirements (zero = trivially satisfied)
    pub min_monthly_sales: i64,
    pub min_monthly_orders: i64,
    pub min_team_size: i64,
    pub min_team_sales: i64,
    pub consecutive_months: i64,
    // Benefits
    pub monthly_bonus: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CommissionTier {
    /// Override rate for an upline level (1-based).
    ///
    /// Levels with no configured rate return None, which ends that level's
    /// override pass.
    pub fn team_sale_rate(&self, level: usize) -> Option<f64> {
        match level {
            1 => Some(self.team_sale_l1_rate),
            2 => self.team_sale_l2_rate,
            _ => None,
        }
    }
}

/// Create tier payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierCreate {
    pub name: String,
    pub display_name: String,
    pub tier_order: i64,
    pub direct_sale_rate: f64,
    pub team_sale_l1_rate: Option<f64>,
    pub team_sale_l2_rate: Option<f64>,
    pub min_monthly_sales: Option<i64>,
    pub min_monthly_orders: Option<i64>,
    pub min_team_size: Option<i64>,
    pub min_team_sales: Option<i64>,
    pub consecutive_months: Option<i64>,
    pub monthly_bonus: Option<i64>,
}

/// Update tier payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierUpdate {
    pub display_name: Option<String>,
    pub tier_order: Option<i64>,
    pub is_active: Option<bool>,
    pub direct_sale_rate: Option<f64>,
    pub team_sale_l1_rate: Option<f64>,
    #[serde(default, deserialize_with = "super::serde_helpers::double_option")]
    pub team_sale_l2_rate: Option<Option<f64>>,
    pub min_monthly_sales: Option<i64>,
    pub min_monthly_orders: Option<i64>,
    pub min_team_size: Option<i64>,
    pub min_team_sales: Option<i64>,
    pub consecutive_months: Option<i64>,
    #[serde(default, deserialize_with = "super::serde_helpers::double_option")]
    pub monthly_bonus: Option<Option<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tier() -> CommissionTier {
        CommissionTier {
            id: 1,
            name: "silver".to_string(),
            display_name: "Silver".to_string(),
            tier_order: 2,
            is_active: true,
            direct_sale_rate: 12.0,
            team_sale_l1_rate: 3.0,
            team_sale_l2_rate: None,
            min_monthly_sales: 5_000_000,
            min_monthly_orders: 0,
            min_team_size: 0,
            min_team_sales: 0,
            consecutive_months: 0,
            monthly_bonus: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_team_sale_rate_levels() {
        let tier = make_tier();
        assert_eq!(tier.team_sale_rate(1), Some(3.0));
        assert_eq!(tier.team_sale_rate(2), None);
        assert_eq!(tier.team_sale_rate(3), None);
    }
}
