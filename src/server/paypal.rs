use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::auth::RequireSession;
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{CaptureOrderRequest, CaptureOrderResponse, CreateOrderRequest};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::validate_order_id;
use crate::types::PurchaseTier;

const ADMIN_PURCHASE_MESSAGE: &str = "Admin accounts have unlimited tokens";

pub async fn create_order(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> impl IntoResponse {
    let user = &auth.user;

    let tier = PurchaseTier::find(&req.tier).ok_or_else(|| ApiError::bad_request("Invalid tier"))?;

    if state.ledger.is_admin(user) {
        return Err(ApiError::bad_request(ADMIN_PURCHASE_MESSAGE));
    }

    let order = state.payments.create_order(&user.id, tier).await?;

    Ok::<_, ApiError>(Json(ApiResponse::success(order)))
}

/// Captures an approved order and credits its tier. Each order id is credited
/// at most once; a replay is rejected before PayPal is contacted.
pub async fn capture_order(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CaptureOrderRequest>,
) -> impl IntoResponse {
    let user = &auth.user;
    validate_order_id(&req.order_id)?;

    if state.ledger.is_admin(user) {
        return Err(ApiError::bad_request(ADMIN_PURCHASE_MESSAGE));
    }

    if state
        .store
        .get_transaction_by_external_id(&req.order_id)
        .api_err("Failed to check order")?
        .is_some()
    {
        return Err(ApiError::conflict("Order has already been credited"));
    }

    let captured = state.payments.capture_order(&req.order_id).await?;

    if !captured.is_completed() {
        tracing::warn!(
            order_id = %req.order_id,
            status = %captured.status,
            "capture did not complete"
        );
        return Err(ApiError::bad_request("Payment capture failed"));
    }

    let Some(capture) = captured.capture else {
        tracing::warn!(order_id = %req.order_id, "completed order has no capture");
        return Err(ApiError::bad_gateway("Payment provider unavailable"));
    };

    if capture.metadata.user_id != user.id {
        tracing::warn!(
            order_id = %req.order_id,
            user_id = %user.id,
            "capture attempted for another user's order"
        );
        return Err(ApiError::forbidden("Order belongs to another user"));
    }

    if capture.currency != state.payments.currency() {
        tracing::warn!(
            order_id = %req.order_id,
            capture_id = %capture.capture_id,
            currency = %capture.currency,
            "capture in unexpected currency"
        );
        return Err(ApiError::bad_request("Payment currency mismatch"));
    }

    let tier = PurchaseTier::find(&capture.metadata.tier)
        .ok_or_else(|| Error::UnknownTier(capture.metadata.tier.clone()))?;

    let receipt = state
        .ledger
        .credit_purchase(user, tier, capture.amount, &req.order_id)?;

    tracing::info!(
        order_id = %req.order_id,
        capture_id = %capture.capture_id,
        "payment captured"
    );

    Ok::<_, ApiError>(Json(ApiResponse::success(CaptureOrderResponse {
        success: true,
        token_count: receipt.token_count,
        tokens_added: receipt.tokens_added,
    })))
}
