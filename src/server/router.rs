use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use super::cors::cors_layer;
use super::{formulas, paypal, sessions, tokens};
use crate::auth::{AdminList, IdentityProvider};
use crate::payments::PaymentGateway;
use crate::store::Store;
use crate::tokens::{Clock, TokenLedger};

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub ledger: TokenLedger,
    pub identity: Arc<dyn IdentityProvider>,
    pub payments: Arc<dyn PaymentGateway>,
    /// Browser origins allowed to make credentialed requests.
    pub allowed_origins: Vec<String>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        admins: AdminList,
        clock: Arc<dyn Clock>,
        identity: Arc<dyn IdentityProvider>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            ledger: TokenLedger::new(store.clone(), admins, clock),
            store,
            identity,
            payments,
            allowed_origins: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Sessions
        .route(
            "/oauth/google/redirect_url",
            get(sessions::google_redirect_url),
        )
        .route("/sessions", post(sessions::create_session))
        .route("/users/me", get(sessions::current_user))
        .route("/logout", get(sessions::logout))
        // Tokens
        .route("/tokens/balance", get(tokens::get_balance))
        .route("/tokens/use", post(tokens::use_token))
        .route("/tokens/transactions", get(tokens::list_transactions))
        .route("/tiers", get(tokens::list_tiers))
        // Purchases
        .route("/paypal/create-order", post(paypal::create_order))
        .route("/paypal/capture-order", post(paypal::capture_order))
        // Calculator
        .route("/formulas", get(formulas::list_formulas))
        .route("/calculate", post(formulas::calculate))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&state.allowed_origins))
                .layer(middleware::from_fn(log_request)),
        )
        .with_state(state)
}
