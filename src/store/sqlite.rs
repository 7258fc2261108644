use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params, types::Type};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database. Mostly useful for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn balance_from_row(row: &Row<'_>) -> rusqlite::Result<UserTokenBalance> {
    Ok(UserTokenBalance {
        user_id: row.get(0)?,
        token_count: row.get(1)?,
        last_refresh_date: parse_date(2, &row.get::<_, String>(2)?)?,
        updated_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<TokenTransaction> {
    let kind: String = row.get(2)?;
    let transaction_type = kind
        .parse::<TransactionType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(TokenTransaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        transaction_type,
        token_amount: row.get(3)?,
        price_paid: row.get(4)?,
        external_transaction_id: row.get(5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Balance operations

    fn get_balance(&self, user_id: &str) -> Result<Option<UserTokenBalance>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT user_id, token_count, last_refresh_date, updated_at
             FROM user_tokens WHERE user_id = ?1",
            params![user_id],
            balance_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn create_balance(&self, balance: &UserTokenBalance) -> Result<()> {
        self.conn().execute(
            "INSERT INTO user_tokens (user_id, token_count, last_refresh_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT (user_id) DO NOTHING",
            params![
                balance.user_id,
                balance.token_count,
                format_date(balance.last_refresh_date),
                format_datetime(&balance.updated_at),
            ],
        )?;
        Ok(())
    }

    fn reset_balance(
        &self,
        user_id: &str,
        token_count: i64,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let date = format_date(date);

        let rows = tx.execute(
            "UPDATE user_tokens SET token_count = ?1, last_refresh_date = ?2, updated_at = ?3
             WHERE user_id = ?4 AND last_refresh_date <> ?2",
            params![token_count, date, format_datetime(&now), user_id],
        )?;

        if rows == 0 {
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM user_tokens WHERE user_id = ?1)",
                params![user_id],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(Error::NotFound);
            }
        }

        tx.commit()?;
        Ok(rows > 0)
    }

    fn debit_token(&self, user_id: &str, now: DateTime<Utc>) -> Result<i64> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let now = format_datetime(&now);

        let rows = tx.execute(
            "UPDATE user_tokens SET token_count = token_count - 1, updated_at = ?1
             WHERE user_id = ?2 AND token_count >= 1",
            params![now, user_id],
        )?;

        if rows == 0 {
            return Err(Error::InsufficientTokens);
        }

        tx.execute(
            "INSERT INTO token_transactions (user_id, transaction_type, token_amount, created_at)
             VALUES (?1, ?2, -1, ?3)",
            params![user_id, TransactionType::Usage.as_str(), now],
        )?;

        let remaining: i64 = tx.query_row(
            "SELECT token_count FROM user_tokens WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;

        tx.commit()?;
        Ok(remaining)
    }

    fn credit_purchase(
        &self,
        user_id: &str,
        token_amount: i64,
        price_paid: f64,
        external_transaction_id: &str,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let now = format_datetime(&now);

        let inserted = tx.execute(
            "INSERT INTO token_transactions
                (user_id, transaction_type, token_amount, price_paid, external_transaction_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                TransactionType::Purchase.as_str(),
                token_amount,
                price_paid,
                external_transaction_id,
                now,
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => {
                return Err(Error::DuplicatePurchase(external_transaction_id.to_string()));
            }
            Err(e) => return Err(Error::from(e)),
        }

        let rows = tx.execute(
            "UPDATE user_tokens SET token_count = token_count + ?1, updated_at = ?2
             WHERE user_id = ?3",
            params![token_amount, now, user_id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }

        let balance: i64 = tx.query_row(
            "SELECT token_count FROM user_tokens WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;

        tx.commit()?;
        Ok(balance)
    }

    // Ledger operations

    fn list_transactions(
        &self,
        user_id: &str,
        before_id: Option<i64>,
        limit: i32,
    ) -> Result<Vec<TokenTransaction>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, transaction_type, token_amount, price_paid, external_transaction_id, created_at
             FROM token_transactions
             WHERE user_id = ?1 AND (?2 IS NULL OR id < ?2)
             ORDER BY id DESC LIMIT ?3",
        )?;

        let rows = stmt.query_map(params![user_id, before_id, limit], transaction_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn get_transaction_by_external_id(
        &self,
        external_transaction_id: &str,
    ) -> Result<Option<TokenTransaction>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, user_id, transaction_type, token_amount, price_paid, external_transaction_id, created_at
             FROM token_transactions WHERE external_transaction_id = ?1",
            params![external_transaction_id],
            transaction_from_row,
        )
        .optional()
        .map_err(Error::from)
    }
}
