use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::Clock;
use crate::auth::AdminList;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{PurchaseTier, SessionUser, TokenTransaction, UserTokenBalance};

/// Tokens granted on the first request of each UTC day.
pub const DAILY_ALLOWANCE: i64 = 25;

/// Count reported to clients for balances that are never tracked.
pub const UNLIMITED_SENTINEL: i64 = 999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balance {
    Unlimited,
    Limited(i64),
}

impl Balance {
    #[must_use]
    pub const fn token_count(self) -> i64 {
        match self {
            Balance::Unlimited => UNLIMITED_SENTINEL,
            Balance::Limited(count) => count,
        }
    }

    #[must_use]
    pub const fn is_unlimited(self) -> bool {
        matches!(self, Balance::Unlimited)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PurchaseReceipt {
    pub token_count: i64,
    pub tokens_added: i64,
}

/// Token accounting for one deployment: daily refresh, debit-on-use and
/// purchase credits. Admins never touch storage.
pub struct TokenLedger {
    store: Arc<dyn Store>,
    admins: AdminList,
    clock: Arc<dyn Clock>,
}

impl TokenLedger {
    pub fn new(store: Arc<dyn Store>, admins: AdminList, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            admins,
            clock,
        }
    }

    #[must_use]
    pub fn is_admin(&self, user: &SessionUser) -> bool {
        self.admins.is_admin(&user.email)
    }

    /// Current balance, creating or refreshing the row as needed.
    pub fn balance(&self, user: &SessionUser) -> Result<Balance> {
        if self.is_admin(user) {
            return Ok(Balance::Unlimited);
        }

        let balance = self.refresh(&user.id, self.clock.today(), self.clock.now())?;
        Ok(Balance::Limited(balance.token_count))
    }

    /// Spends one token. Fails with `Error::InsufficientTokens` on an empty
    /// balance, leaving it unchanged.
    pub fn use_token(&self, user: &SessionUser) -> Result<Balance> {
        if self.is_admin(user) {
            return Ok(Balance::Unlimited);
        }

        let now = self.clock.now();
        self.refresh(&user.id, self.clock.today(), now)?;

        match self.store.debit_token(&user.id, now) {
            Ok(remaining) => {
                tracing::debug!(user_id = %user.id, remaining, "token used");
                Ok(Balance::Limited(remaining))
            }
            Err(Error::InsufficientTokens) => {
                tracing::info!(user_id = %user.id, "token use rejected: balance empty");
                Err(Error::InsufficientTokens)
            }
            Err(e) => Err(e),
        }
    }

    /// Credits a completed purchase. `external_transaction_id` may only be
    /// credited once.
    pub fn credit_purchase(
        &self,
        user: &SessionUser,
        tier: &PurchaseTier,
        price_paid: f64,
        external_transaction_id: &str,
    ) -> Result<PurchaseReceipt> {
        if self.is_admin(user) {
            return Err(Error::BadRequest(
                "Admin accounts have unlimited tokens".to_string(),
            ));
        }

        let now = self.clock.now();
        self.refresh(&user.id, self.clock.today(), now)?;

        let token_count = self.store.credit_purchase(
            &user.id,
            tier.token_grant,
            price_paid,
            external_transaction_id,
            now,
        )?;

        tracing::info!(
            user_id = %user.id,
            tier = tier.id,
            tokens = tier.token_grant,
            price_paid,
            order_id = external_transaction_id,
            "purchase credited"
        );

        Ok(PurchaseReceipt {
            token_count,
            tokens_added: tier.token_grant,
        })
    }

    /// Ledger rows for the user, newest first.
    pub fn transactions(
        &self,
        user: &SessionUser,
        before_id: Option<i64>,
        limit: i32,
    ) -> Result<Vec<TokenTransaction>> {
        if self.is_admin(user) {
            return Ok(Vec::new());
        }
        self.store.list_transactions(&user.id, before_id, limit)
    }

    fn refresh(
        &self,
        user_id: &str,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<UserTokenBalance> {
        match self.store.get_balance(user_id)? {
            None => {
                let fresh = UserTokenBalance {
                    user_id: user_id.to_string(),
                    token_count: DAILY_ALLOWANCE,
                    last_refresh_date: today,
                    updated_at: now,
                };
                self.store.create_balance(&fresh)?;
                tracing::info!(user_id, "created token balance");

                // A concurrent first request may have won the insert.
                Ok(self.store.get_balance(user_id)?.unwrap_or(fresh))
            }
            Some(balance) if balance.last_refresh_date != today => {
                // Only a stale row is reset. Read back whatever concurrent
                // requests left behind.
                if self
                    .store
                    .reset_balance(user_id, DAILY_ALLOWANCE, today, now)?
                {
                    tracing::debug!(
                        user_id,
                        previous = balance.token_count,
                        last_refresh = %balance.last_refresh_date,
                        "daily token refresh"
                    );
                }
                self.store.get_balance(user_id)?.ok_or(Error::NotFound)
            }
            Some(balance) => Ok(balance),
        }
    }
}
