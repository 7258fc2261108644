#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use calcmeter::auth::{AdminList, IdentityProvider, SESSION_COOKIE};
use calcmeter::error::{Error, Result};
use calcmeter::payments::{
    CaptureDetails, CapturedOrder, CreatedOrder, OrderMetadata, PaymentGateway,
};
use calcmeter::server::{AppState, create_router};
use calcmeter::store::{SqliteStore, Store};
use calcmeter::tokens::FixedClock;
use calcmeter::types::{PurchaseTier, SessionUser};

pub const STUDENT_TOKEN: &str = "student-session";
pub const OTHER_STUDENT_TOKEN: &str = "other-session";
pub const ADMIN_TOKEN: &str = "admin-session";

pub const STUDENT_ID: &str = "student-1";
pub const OTHER_STUDENT_ID: &str = "student-2";
pub const ADMIN_ID: &str = "admin-1";

pub const VALID_CODE: &str = "good-oauth-code";

/// Users service stand-in with a fixed set of sessions.
#[derive(Default)]
pub struct FakeIdentity {
    sessions: Mutex<HashMap<String, SessionUser>>,
    deleted: Mutex<Vec<String>>,
    unavailable: AtomicBool,
}

impl FakeIdentity {
    pub fn add_session(&self, token: &str, user: SessionUser) {
        self.sessions
            .lock()
            .unwrap()
            .insert(token.to_string(), user);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn deleted_sessions(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::Identity("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn redirect_url(&self, provider: &str) -> Result<String> {
        self.check_available()?;
        Ok(format!("https://accounts.example.com/{provider}/authorize"))
    }

    async fn exchange_code(&self, code: &str) -> Result<String> {
        self.check_available()?;
        if code == VALID_CODE {
            Ok(STUDENT_TOKEN.to_string())
        } else {
            Err(Error::Unauthorized)
        }
    }

    async fn current_user(&self, session_token: &str) -> Result<Option<SessionUser>> {
        self.check_available()?;
        Ok(self.sessions.lock().unwrap().get(session_token).cloned())
    }

    async fn delete_session(&self, session_token: &str) -> Result<()> {
        self.check_available()?;
        self.deleted
            .lock()
            .unwrap()
            .push(session_token.to_string());
        Ok(())
    }
}

/// PayPal stand-in. Orders only capture once a test approves them.
#[derive(Default)]
pub struct FakePayments {
    next_id: AtomicUsize,
    approved: Mutex<HashMap<String, CapturedOrder>>,
    captures: AtomicUsize,
}

impl FakePayments {
    /// Marks an order as paid by `user_id` for `tier_id` at `amount`.
    pub fn approve(&self, order_id: &str, user_id: &str, tier_id: &str, amount: f64) {
        let tier = PurchaseTier::find(tier_id).unwrap();
        self.set_result(
            order_id,
            CapturedOrder {
                order_id: order_id.to_string(),
                status: "COMPLETED".to_string(),
                capture: Some(CaptureDetails {
                    capture_id: format!("CAP-{order_id}"),
                    amount,
                    currency: "USD".to_string(),
                    metadata: OrderMetadata::for_tier(user_id, tier),
                }),
            },
        );
    }

    pub fn set_result(&self, order_id: &str, order: CapturedOrder) {
        self.approved
            .lock()
            .unwrap()
            .insert(order_id.to_string(), order);
    }

    pub fn capture_calls(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for FakePayments {
    fn currency(&self) -> &str {
        "USD"
    }

    async fn create_order(&self, _user_id: &str, _tier: &PurchaseTier) -> Result<CreatedOrder> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("ORDER{n:04}");
        Ok(CreatedOrder {
            approve_url: Some(format!("https://www.paypal.example/checkoutnow?token={id}")),
            id,
            status: "CREATED".to_string(),
        })
    }

    async fn capture_order(&self, order_id: &str) -> Result<CapturedOrder> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        self.approved
            .lock()
            .unwrap()
            .get(order_id)
            .cloned()
            .ok_or_else(|| Error::Payment(format!("order {order_id} not found")))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteStore>,
    pub clock: Arc<FixedClock>,
    pub identity: Arc<FakeIdentity>,
    pub payments: Arc<FakePayments>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn set_cookie(&self) -> String {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(SqliteStore::in_memory().expect("open store"));
        store.initialize().expect("initialize schema");

        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap(),
        ));

        let identity = Arc::new(FakeIdentity::default());
        identity.add_session(STUDENT_TOKEN, user(STUDENT_ID, "student@school.edu"));
        identity.add_session(OTHER_STUDENT_TOKEN, user(OTHER_STUDENT_ID, "friend@school.edu"));
        identity.add_session(ADMIN_TOKEN, user(ADMIN_ID, "Admin@School.edu"));

        let payments = Arc::new(FakePayments::default());

        let state = AppState::new(
            store.clone(),
            AdminList::parse(" admin@school.edu , principal@school.edu"),
            clock.clone(),
            identity.clone(),
            payments.clone(),
        );

        Self {
            router: create_router(Arc::new(state)),
            store,
            clock,
            identity,
            payments,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        session: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = session {
            builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, session: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, session, None).await
    }

    pub async fn post(&self, uri: &str, session: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, session, Some(body)).await
    }

    /// Token count reported by the balance endpoint.
    pub async fn balance(&self, session: &str) -> i64 {
        let resp = self.get("/api/tokens/balance", Some(session)).await;
        assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.body);
        resp.body["data"]["token_count"].as_i64().unwrap()
    }
}

pub fn user(id: &str, email: &str) -> SessionUser {
    SessionUser {
        id: id.to_string(),
        email: email.to_string(),
        name: None,
        picture: None,
    }
}
