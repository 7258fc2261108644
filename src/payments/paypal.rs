
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{CaptureDetails, CapturedOrder, CreatedOrder, OrderMetadata, PaymentGateway};
use crate::config::PayPalConfig;
use crate::error::{Error, Result};
use crate::types::PurchaseTier;

const STATUS_NOT_CAPTURABLE: &str = "NOT_CAPTURABLE";

/// Idempotency key PayPal uses to deduplicate order creation.
const REQUEST_ID_HEADER: &str = "PayPal-Request-Id";

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    status: String,
    #[serde(default)]
    links: Vec<Link>,
    #[serde(default)]
    purchase_units: Vec<PurchaseUnit>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
    rel: String,
}

#[derive(Debug, Deserialize)]
struct PurchaseUnit {
    #[serde(default)]
    payments: Option<Payments>,
}

#[derive(Debug, Deserialize)]
struct Payments {
    #[serde(default)]
    captures: Vec<Capture>,
}

#[derive(Debug, Deserialize)]
struct Capture {
    id: String,
    amount: Money,
    #[serde(default)]
    custom_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Money {
    currency_code: String,
    value: String,
}

/// PayPal Orders v2 client using client-credentials auth.
#[derive(Clone)]
pub struct PayPalClient {
    client: Client,
    config: PayPalConfig,
}

impl PayPalClient {
    pub fn new(config: &PayPalConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("failed to build PayPal client: {e}")))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    async fn access_token(&self) -> Result<String> {
        let resp = self
            .client
            .post(self.url("/v1/oauth2/token"))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| Error::Payment(format!("token request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::Payment(format!(
                "token request returned {}",
                resp.status()
            )));
        }

        let body: AccessTokenResponse = resp
            .json()
            .await
            .map_err(|e| Error::Payment(format!("invalid token response: {e}")))?;
        Ok(body.access_token)
    }
}

async fn order_response(resp: reqwest::Response, context: &str) -> Result<OrderResponse> {
    let status = resp.status();
    if !status.is_success() {
        let detail = resp.text().await.unwrap_or_default();
        tracing::warn!("PayPal {context} returned {status}: {detail}");
        return Err(Error::Payment(format!("{context} returned {status}")));
    }

    resp.json()
        .await
        .map_err(|e| Error::Payment(format!("invalid {context} response: {e}")))
}

fn approve_url(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel == "approve" || l.rel == "payer-action")
        .map(|l| l.href.clone())
}

fn to_captured_order(order: OrderResponse) -> Result<CapturedOrder> {
    let capture = order
        .purchase_units
        .into_iter()
        .next()
        .and_then(|unit| unit.payments)
        .and_then(|payments| payments.captures.into_iter().next());

    let capture = match capture {
        Some(capture) => {
            let custom_id = capture
                .custom_id
                .ok_or_else(|| Error::Payment("capture is missing order metadata".to_string()))?;
            let amount = capture.amount.value.parse::<f64>().map_err(|e| {
                Error::Payment(format!("invalid capture amount '{}': {e}", capture.amount.value))
            })?;

            Some(CaptureDetails {
                capture_id: capture.id,
                amount,
                currency: capture.amount.currency_code,
                metadata: OrderMetadata::from_custom_id(&custom_id)?,
            })
        }
        None => None,
    };

    Ok(CapturedOrder {
        order_id: order.id,
        status: order.status,
        capture,
    })
}

#[async_trait]
impl PaymentGateway for PayPalClient {
    fn currency(&self) -> &str {
        &self.config.currency
    }

    async fn create_order(&self, user_id: &str, tier: &PurchaseTier) -> Result<CreatedOrder> {
        let access_token = self.access_token().await?;
        let custom_id = OrderMetadata::for_tier(user_id, tier).to_custom_id()?;

        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": {
                    "currency_code": self.config.currency,
                    "value": tier.price(),
                },
                "description": tier.description(),
                "custom_id": custom_id,
            }],
        });

        let resp = self
            .client
            .post(self.url("/v2/checkout/orders"))
            .bearer_auth(&access_token)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Payment(format!("create order failed: {e}")))?;

        let order = order_response(resp, "create order").await?;
        tracing::info!(order_id = %order.id, user_id, tier = tier.id, "PayPal order created");

        Ok(CreatedOrder {
            approve_url: approve_url(&order.links),
            id: order.id,
            status: order.status,
        })
    }

    async fn capture_order(&self, order_id: &str) -> Result<CapturedOrder> {
        let access_token = self.access_token().await?;

        let resp = self
            .client
            .post(self.url(&format!(
                "/v2/checkout/orders/{}/capture",
                urlencoding::encode(order_id)
            )))
            .bearer_auth(&access_token)
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| Error::Payment(format!("capture failed: {e}")))?;

        // PayPal answers 422 for orders the buyer never approved.
        if resp.status() == StatusCode::UNPROCESSABLE_ENTITY {
            let detail = resp.text().await.unwrap_or_default();
            tracing::info!(order_id, "capture refused: {detail}");
            return Ok(CapturedOrder {
                order_id: order_id.to_string(),
                status: STATUS_NOT_CAPTURABLE.to_string(),
                capture: None,
            });
        }

        let order = order_response(resp, "capture").await?;
        to_captured_order(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETED_CAPTURE: &str = r#"{
        "id": "5O190127TN364715T",
        "status": "COMPLETED",
        "purchase_units": [{
            "reference_id": "default",
            "payments": {
                "captures": [{
                    "id": "3C679366HH908993F",
                    "status": "COMPLETED",
                    "amount": { "currency_code": "USD", "value": "20.00" },
                    "custom_id": "{\"userId\":\"user-1\",\"tier\":\"tier2\",\"tokens\":500}"
                }]
            }
        }],
        "links": []
    }"#;

    #[test]
    fn test_completed_capture_is_parsed() {
        let order: OrderResponse = serde_json::from_str(COMPLETED_CAPTURE).unwrap();
        let captured = to_captured_order(order).unwrap();

        assert!(captured.is_completed());
        assert_eq!(captured.order_id, "5O190127TN364715T");

        let capture = captured.capture.unwrap();
        assert_eq!(capture.capture_id, "3C679366HH908993F");
        assert_eq!(capture.amount, 20.0);
        assert_eq!(capture.currency, "USD");
        assert_eq!(capture.metadata.user_id, "user-1");
        assert_eq!(capture.metadata.tier, "tier2");
    }

    #[test]
    fn test_pending_order_without_captures() {
        let order: OrderResponse = serde_json::from_str(
            r#"{"id":"ORDER-1","status":"PAYER_ACTION_REQUIRED","purchase_units":[{}]}"#,
        )
        .unwrap();
        let captured = to_captured_order(order).unwrap();

        assert!(!captured.is_completed());
        assert!(captured.capture.is_none());
    }

    #[test]
    fn test_capture_without_metadata_is_rejected() {
        let order: OrderResponse = serde_json::from_str(
            r#"{"id":"ORDER-2","status":"COMPLETED","purchase_units":[{"payments":{"captures":[
                {"id":"CAP","amount":{"currency_code":"USD","value":"5.00"}}
            ]}}]}"#,
        )
        .unwrap();

        assert!(matches!(to_captured_order(order), Err(Error::Payment(_))));
    }

    #[test]
    fn test_approve_url_prefers_approve_or_payer_action() {
        let links = vec![
            Link {
                href: "https://api.paypal.com/self".to_string(),
                rel: "self".to_string(),
            },
            Link {
                href: "https://www.paypal.com/checkoutnow?token=X".to_string(),
                rel: "payer-action".to_string(),
            },
        ];
        assert_eq!(
            approve_url(&links).as_deref(),
            Some("https://www.paypal.com/checkoutnow?token=X")
        );
        assert!(approve_url(&[]).is_none());
    }

    #[test]
    fn test_url_joins_api_base() {
        let client = PayPalClient::new(&PayPalConfig {
            api_base: "https://api-m.sandbox.paypal.com/".to_string(),
            ..PayPalConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.url("/v1/oauth2/token"),
            "https://api-m.sandbox.paypal.com/v1/oauth2/token"
        );
    }
}
