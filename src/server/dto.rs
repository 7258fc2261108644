use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::formulas::Solution;
use crate::tokens::Balance;
use crate::types::{PurchaseTier, SessionUser};

#[derive(Debug, Serialize)]
pub struct RedirectUrlResponse {
    pub redirect_url: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: SessionUser,
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub token_count: i64,
    pub is_admin: bool,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self {
            token_count: balance.token_count(),
            is_admin: balance.is_unlimited(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsParams {
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub tier: String,
}

#[derive(Debug, Deserialize)]
pub struct CaptureOrderRequest {
    #[serde(default)]
    pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct CaptureOrderResponse {
    pub success: bool,
    pub token_count: i64,
    pub tokens_added: i64,
}

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub formula_id: String,
    pub solve_for: String,
    #[serde(default)]
    pub values: HashMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub formula_id: String,
    pub solve_for: String,
    pub result: Solution,
    pub token_count: i64,
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct TierResponse {
    pub id: &'static str,
    pub price: String,
    pub token_grant: i64,
    pub description: String,
}

impl From<&PurchaseTier> for TierResponse {
    fn from(tier: &PurchaseTier) -> Self {
        Self {
            id: tier.id,
            price: tier.price(),
            token_grant: tier.token_grant,
            description: tier.description(),
        }
    }
}
