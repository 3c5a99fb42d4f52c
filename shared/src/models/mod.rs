//! Domain Models
//!
//! Flattened row types for the SQLite schema plus the create/update payloads
//! consumed by the HTTP layer. `db` feature gates the sqlx derives.

pub mod order;
pub mod serde_helpers;
pub mod summary;
pub mod team;
pub mod tier;
pub mod transaction;
pub mod user;

pub use order::CompletedOrder;
pub use summary::{
    CalculationOutcome, CommissionSummary, PromotionProgress, RequirementProgress, TeamStats,
    UserCommissionDetail,
};
pub use team::{Team, TeamCreate};
pub use tier::{CommissionTier, TierCreate, TierUpdate};
pub use transaction::{
    CommissionTransaction, CommissionType, PayTransactions, ReviewTransactions, TransactionStatus,
};
pub use user::{CommissionSettingsUpdate, User, UserCreate, UserRole};
