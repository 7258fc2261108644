use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Per-user token balance row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTokenBalance {
    pub user_id: String,
    pub token_count: i64,
    pub last_refresh_date: NaiveDate,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Usage,
    Purchase,
}

impl TransactionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TransactionType::Usage => "usage",
            TransactionType::Purchase => "purchase",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "usage" => Ok(TransactionType::Usage),
            "purchase" => Ok(TransactionType::Purchase),
            other => Err(Error::BadRequest(format!(
                "unknown transaction type: {other}"
            ))),
        }
    }
}

/// Append-only ledger entry. Rows are never updated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTransaction {
    pub id: i64,
    pub user_id: String,
    pub transaction_type: TransactionType,
    /// Signed delta applied to the balance.
    pub token_amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_paid: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_round_trips_through_str() {
        assert_eq!("usage".parse::<TransactionType>().unwrap(), TransactionType::Usage);
        assert_eq!(
            "purchase".parse::<TransactionType>().unwrap(),
            TransactionType::Purchase
        );
        assert_eq!(TransactionType::Purchase.to_string(), "purchase");
    }

    #[test]
    fn test_transaction_type_rejects_unknown() {
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_transaction_serializes_lowercase_type() {
        let tx = TokenTransaction {
            id: 1,
            user_id: "user-1".to_string(),
            transaction_type: TransactionType::Usage,
            token_amount: -1,
            price_paid: None,
            external_transaction_id: None,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["transaction_type"], "usage");
        assert!(value.get("price_paid").is_none());
    }
}
