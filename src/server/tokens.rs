use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::auth::RequireSession;
use crate::server::AppState;
use crate::server::dto::{BalanceResponse, ListTransactionsParams, TierResponse};
use crate::server::response::{
    ApiError, ApiResponse, DEFAULT_PAGE_SIZE, PaginatedResponse, StoreResultExt, paginate,
};
use crate::types::PURCHASE_TIERS;

pub async fn get_balance(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let balance = state.ledger.balance(&auth.user)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(BalanceResponse::from(balance))))
}

pub async fn use_token(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let balance = state.ledger.use_token(&auth.user)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(BalanceResponse::from(balance))))
}

pub async fn list_transactions(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTransactionsParams>,
) -> impl IntoResponse {
    let before_id = match params.cursor.as_deref() {
        None | Some("") => None,
        Some(cursor) => Some(
            cursor
                .parse::<i64>()
                .map_err(|_| ApiError::bad_request("Invalid cursor"))?,
        ),
    };

    let transactions = state
        .ledger
        .transactions(&auth.user, before_id, DEFAULT_PAGE_SIZE + 1)
        .api_err("Failed to list transactions")?;

    let (transactions, next_cursor, has_more) =
        paginate(transactions, DEFAULT_PAGE_SIZE as usize, |t| t.id.to_string());

    Ok::<_, ApiError>(Json(PaginatedResponse::new(
        transactions,
        next_cursor,
        has_more,
    )))
}

pub async fn list_tiers() -> impl IntoResponse {
    let tiers: Vec<TierResponse> = PURCHASE_TIERS.iter().map(TierResponse::from).collect();
    Json(ApiResponse::success(tiers))
}
