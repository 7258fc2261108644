//! # Calcmeter
//!
//! Backend for a CSEC mathematics formula calculator where every calculation
//! costs a token. Users get a daily allowance, can top up through PayPal, and
//! admins on an email allow-list are never charged.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! calcmeter = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use calcmeter::auth::{AdminList, UsersServiceClient};
//! use calcmeter::payments::PayPalClient;
//! use calcmeter::server::{AppState, create_router};
//! use calcmeter::store::{SqliteStore, Store};
//! use calcmeter::tokens::SystemClock;
//!
//! let store = SqliteStore::new("./data/calcmeter.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(
//!     Arc::new(store),
//!     AdminList::parse("headmaster@school.edu"),
//!     Arc::new(SystemClock),
//!     Arc::new(UsersServiceClient::new(&config.identity).unwrap()),
//!     Arc::new(PayPalClient::new(&config.paypal).unwrap()),
//! ));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `calcmeter` binary. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod formulas;
pub mod payments;
pub mod server;
pub mod store;
pub mod tokens;
pub mod types;
