//! Token accounting: daily allowance, debit-on-use and purchase credits.

mod clock;
mod ledger;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ledger::{Balance, DAILY_ALLOWANCE, PurchaseReceipt, TokenLedger, UNLIMITED_SENTINEL};
