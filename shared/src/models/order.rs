//! Completed Order Input
//!
//! The order-completion collaborator posts this once per completed order.
//! The caller guarantees the order is in a completed/eligible state; the
//! engine's unique ledger index makes a duplicate post a conflict rather
//! than a double payout.

use serde::{Deserialize, Serialize};

/// Completed order handed to the commission engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedOrder {
    pub id: i64,
    pub order_number: String,
    /// Integer currency units, must be positive
    pub total_amount: i64,
    /// Order owner
    pub user_id: i64,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}
