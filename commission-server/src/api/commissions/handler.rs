//! Commission Calculation Handlers

use axum::{Json, extract::State};

use shared::models::{CalculationOutcome, CompletedOrder};

use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/commissions/calculate - process one completed order
///
/// The caller posts each completed order exactly once; a repeated post for
/// the same order id is rejected with a conflict and leaves no partial
/// state.
pub async fn calculate(
    State(state): State<ServerState>,
    Json(order): Json<CompletedOrder>,
) -> AppResult<Json<CalculationOutcome>> {
    let outcome = state.engine.calculate_commission(&order).await?;
    Ok(Json(outcome))
}
