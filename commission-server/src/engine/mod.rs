//! Commission Engine
//!
//! Orchestrates the work triggered by one completed order: commission
//! passes, performance counters, promotion check. The whole body runs as a
//! single database transaction and is serialized per order owner, so
//! concurrent orders for one participant cannot race the
//! read-check-write of the promotion step or lose counter increments.

pub mod calculator;
pub mod ledger;
pub mod performance;
pub mod promotion;

use std::sync::Arc;

use chrono::{Datelike, Utc};
use dashmap::DashMap;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use shared::models::{
    CalculationOutcome, CommissionSettingsUpdate, CompletedOrder, TeamStats, User,
    UserCommissionDetail,
};

use crate::core::Config;
use crate::db::repository::{team, tier, user};
use crate::utils::{AppError, AppResult};

pub use performance::ResetOutcome;

/// How tenure-in-tier accrues at each monthly reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenurePolicy {
    /// Every reset counts one more month in tier
    AlwaysAccrue,
    /// A month only counts when the current tier's month requirements were
    /// met; a failed month resets tenure to zero
    RequireRequirements,
}

impl TenurePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "always_accrue" => Some(Self::AlwaysAccrue),
            "require_requirements" => Some(Self::RequireRequirements),
            _ => None,
        }
    }
}

/// Explicit knobs for behaviors the business rules leave ambiguous
#[derive(Debug, Clone)]
pub struct EnginePolicy {
    /// Whether the team-sales requirement sums all direct reports or only
    /// commission-earning roles (the team-size count always filters roles)
    pub team_sales_includes_all_roles: bool,
    pub tenure_policy: TenurePolicy,
    /// Upline levels the override walk may visit
    pub max_override_depth: usize,
    pub default_currency: String,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            team_sales_includes_all_roles: true,
            tenure_policy: TenurePolicy::AlwaysAccrue,
            max_override_depth: 2,
            default_currency: "VND".to_string(),
        }
    }
}

impl EnginePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            team_sales_includes_all_roles: config.team_sales_includes_all_roles,
            tenure_policy: config.tenure_policy,
            max_override_depth: config.max_override_depth,
            default_currency: config.default_currency.clone(),
        }
    }
}

/// Per-participant locks serializing commission-affecting operations
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Lock handle for one participant, created on first use
    pub fn for_user(&self, user_id: i64) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Calculation context threaded through the passes
#[derive(Debug, Clone)]
pub(crate) struct CalcContext {
    pub period_year: i64,
    pub period_month: i64,
    pub currency: String,
    pub now: i64,
}

impl CalcContext {
    /// Attribute to the current calendar month
    fn current(currency: &str) -> Self {
        let today = Utc::now();
        Self {
            period_year: today.year() as i64,
            period_month: today.month() as i64,
            currency: currency.to_string(),
            now: shared::util::now_millis(),
        }
    }
}

#[derive(Clone)]
pub struct CommissionEngine {
    pool: SqlitePool,
    policy: Arc<EnginePolicy>,
    locks: Arc<UserLocks>,
}

impl CommissionEngine {
    pub fn new(pool: SqlitePool, policy: EnginePolicy) -> Self {
        Self {
            pool,
            policy: Arc::new(policy),
            locks: Arc::new(UserLocks::new()),
        }
    }

    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    /// Process one completed order.
    ///
    /// Pass order: direct sale, override walk, performance increments,
    /// promotion check. The passes read pre-order standing; the promotion
    /// check reads the just-incremented counters.
    pub async fn calculate_commission(
        &self,
        order: &CompletedOrder,
    ) -> AppResult<CalculationOutcome> {
        if order.total_amount <= 0 {
            return Err(AppError::validation(format!(
                "Order total must be positive: {}",
                order.total_amount
            )));
        }

        let lock = self.locks.for_user(order.user_id);
        let _guard = lock.lock().await;

        let ctx = CalcContext::current(&self.policy.default_currency);
        let mut tx = self.pool.begin().await?;

        let created = calculator::run_passes(&mut tx, &self.policy, order, &ctx).await?;
        performance::record_order(&mut tx, order, ctx.now).await?;
        let promoted_to = promotion::evaluate(&mut tx, &self.policy, order.user_id, &ctx).await?;

        tx.commit().await?;

        tracing::info!(
            order_id = order.id,
            user_id = order.user_id,
            transactions = created.len(),
            "commission calculated"
        );

        Ok(CalculationOutcome {
            order_id: order.id,
            transactions_created: created.len(),
            promoted_to,
        })
    }

    /// Externally-triggered monthly reset
    pub async fn monthly_reset(&self) -> AppResult<ResetOutcome> {
        performance::monthly_reset(&self.pool, &self.policy).await
    }

    /// Admin commission settings update.
    ///
    /// Field-by-field merge under the participant's lock; invalid
    /// references are rejected before anything is written.
    pub async fn update_settings(
        &self,
        user_id: i64,
        update: CommissionSettingsUpdate,
    ) -> AppResult<User> {
        if let Some(Some(rate)) = update.personal_commission_rate {
            if !(0.0..=100.0).contains(&rate) {
                return Err(AppError::validation(format!(
                    "Personal commission rate must be between 0 and 100: {rate}"
                )));
            }
        }

        let lock = self.locks.for_user(user_id);
        let _guard = lock.lock().await;

        let mut tx = self.pool.begin().await?;
        let mut user = user::find_by_id(&mut *tx, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id}")))?;

        if let Some(tier_name) = update.tier {
            if tier::find_by_name(&mut *tx, &tier_name).await?.is_none() {
                return Err(AppError::validation(format!("Unknown tier: {tier_name}")));
            }
            user.tier = tier_name;
        }
        if let Some(rate) = update.personal_commission_rate {
            user.personal_commission_rate = rate;
        }
        if let Some(manager_id) = update.manager_id {
            if let Some(id) = manager_id {
                if id == user_id {
                    return Err(AppError::validation(
                        "A participant cannot be their own manager".to_string(),
                    ));
                }
                if user::find_by_id(&mut *tx, id).await?.is_none() {
                    return Err(AppError::validation(format!("Unknown manager: {id}")));
                }
            }
            user.manager_id = manager_id;
        }
        if let Some(team_id) = update.team_id {
            if let Some(id) = team_id {
                if team::find_by_id(&mut *tx, id).await?.is_none() {
                    return Err(AppError::validation(format!("Unknown team: {id}")));
                }
            }
            user.team_id = team_id;
        }
        if let Some(flag) = update.tier_override {
            user.tier_override = flag;
        }

        let now = shared::util::now_millis();
        user::update_settings(&mut *tx, &user, now).await?;
        tx.commit().await?;

        user::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id}")))
    }

    /// Commission detail view: current and next tier, per-dimension
    /// progress, team stats, period earnings
    pub async fn user_commission_detail(&self, user_id: i64) -> AppResult<UserCommissionDetail> {
        let mut conn = self.pool.acquire().await?;

        let user = user::find_by_id(&mut *conn, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id}")))?;

        let current = tier::find_by_name(&mut *conn, &user.tier).await?;
        let next = match &current {
            Some(t) => tier::find_next(&mut *conn, t.tier_order).await?,
            None => None,
        };

        let stats = promotion::measure(&mut conn, &self.policy, &user).await?;
        let progress = next.as_ref().map(|t| promotion::progress(t, &stats));

        let ctx = CalcContext::current(&self.policy.default_currency);
        let period_earnings = crate::db::repository::transaction::sum_for_period(
            &mut *conn,
            user_id,
            ctx.period_year,
            ctx.period_month,
        )
        .await?;

        Ok(UserCommissionDetail {
            user_id,
            name: user.name.clone(),
            tier: current,
            next_tier: next,
            progress,
            team_stats: TeamStats {
                team_size: stats.team_size,
                team_sales: stats.team_sales,
            },
            period_earnings,
            total_commission: user.total_commission,
        })
    }
}
