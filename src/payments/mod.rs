//! Payment processor integration.
//!
//! Orders carry an [`OrderMetadata`] blob in PayPal's `custom_id` so a capture
//! can be matched back to the user and tier that created it.

mod paypal;

pub use paypal::PayPalClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::PurchaseTier;

pub const STATUS_COMPLETED: &str = "COMPLETED";

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Currency orders are created in. Captures in any other currency are refused.
    fn currency(&self) -> &str;

    async fn create_order(&self, user_id: &str, tier: &PurchaseTier) -> Result<CreatedOrder>;

    async fn capture_order(&self, order_id: &str) -> Result<CapturedOrder>;
}

/// Identifies who an order is for. Serialized into the order's `custom_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMetadata {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub tier: String,
    pub tokens: i64,
}

impl OrderMetadata {
    #[must_use]
    pub fn for_tier(user_id: &str, tier: &PurchaseTier) -> Self {
        Self {
            user_id: user_id.to_string(),
            tier: tier.id.to_string(),
            tokens: tier.token_grant,
        }
    }

    pub fn to_custom_id(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Payment(e.to_string()))
    }

    pub fn from_custom_id(custom_id: &str) -> Result<Self> {
        serde_json::from_str(custom_id)
            .map_err(|e| Error::Payment(format!("malformed order metadata: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedOrder {
    pub id: String,
    pub status: String,
    /// Where the buyer approves the payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approve_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapturedOrder {
    pub order_id: String,
    pub status: String,
    /// Present when the provider returned at least one capture.
    pub capture: Option<CaptureDetails>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureDetails {
    pub capture_id: String,
    pub amount: f64,
    pub currency: String,
    pub metadata: OrderMetadata,
}

impl CapturedOrder {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_uses_camel_case_user_id() {
        let tier = PurchaseTier::find("tier2").unwrap();
        let custom_id = OrderMetadata::for_tier("user-7", tier)
            .to_custom_id()
            .unwrap();
        assert_eq!(custom_id, r#"{"userId":"user-7","tier":"tier2","tokens":500}"#);

        let parsed = OrderMetadata::from_custom_id(&custom_id).unwrap();
        assert_eq!(parsed.user_id, "user-7");
    }

    #[test]
    fn test_malformed_metadata_is_payment_error() {
        let result = OrderMetadata::from_custom_id("not json");
        assert!(matches!(result, Err(Error::Payment(_))));
    }
}
