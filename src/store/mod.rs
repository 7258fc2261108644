mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Balance operations
    fn get_balance(&self, user_id: &str) -> Result<Option<UserTokenBalance>>;
    /// Inserts a balance row unless one already exists for the user.
    fn create_balance(&self, balance: &UserTokenBalance) -> Result<()>;
    /// Resets the balance to `token_count` unless it was already refreshed on
    /// `date`. Returns whether the row changed.
    fn reset_balance(
        &self,
        user_id: &str,
        token_count: i64,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<bool>;

    /// Removes one token and records a usage row in the same transaction.
    /// Fails with `Error::InsufficientTokens` when the balance is empty.
    fn debit_token(&self, user_id: &str, now: DateTime<Utc>) -> Result<i64>;

    /// Adds `token_amount` and records a purchase row in the same transaction.
    /// Fails with `Error::DuplicatePurchase` when `external_transaction_id`
    /// was already credited.
    fn credit_purchase(
        &self,
        user_id: &str,
        token_amount: i64,
        price_paid: f64,
        external_transaction_id: &str,
        now: DateTime<Utc>,
    ) -> Result<i64>;

    // Ledger operations
    fn list_transactions(
        &self,
        user_id: &str,
        before_id: Option<i64>,
        limit: i32,
    ) -> Result<Vec<TokenTransaction>>;
    fn get_transaction_by_external_id(
        &self,
        external_transaction_id: &str,
    ) -> Result<Option<TokenTransaction>>;
}
