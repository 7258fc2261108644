use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::auth::RequireSession;
use crate::formulas::{self, CATEGORIES};
use crate::server::AppState;
use crate::server::dto::{CalculateRequest, CalculateResponse};
use crate::server::response::{ApiError, ApiResponse};

pub async fn list_formulas() -> impl IntoResponse {
    Json(ApiResponse::success(&CATEGORIES))
}

/// Solves first and only charges a token when there is an answer.
pub async fn calculate(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalculateRequest>,
) -> impl IntoResponse {
    let formula =
        formulas::find(&req.formula_id).ok_or_else(|| ApiError::not_found("Formula not found"))?;

    let result = formula.solve(&req.solve_for, &req.values)?;
    let balance = state.ledger.use_token(&auth.user)?;

    tracing::debug!(
        user_id = %auth.user.id,
        formula = formula.id,
        target = %req.solve_for,
        "calculation charged"
    );

    Ok::<_, ApiError>(Json(ApiResponse::success(CalculateResponse {
        formula_id: req.formula_id,
        solve_for: req.solve_for,
        result,
        token_count: balance.token_count(),
        is_admin: balance.is_unlimited(),
    })))
}
