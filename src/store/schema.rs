pub const SCHEMA: &str = r#"
-- One balance row per user; user identity itself lives in the users service
CREATE TABLE IF NOT EXISTS user_tokens (
    user_id TEXT PRIMARY KEY,
    token_count INTEGER NOT NULL DEFAULT 0 CHECK (token_count >= 0),
    last_refresh_date TEXT NOT NULL,   -- YYYY-MM-DD, UTC calendar day
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Append-only ledger of balance-affecting events
CREATE TABLE IF NOT EXISTS token_transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    transaction_type TEXT NOT NULL CHECK (transaction_type IN ('usage', 'purchase')),
    token_amount INTEGER NOT NULL,
    price_paid REAL,                   -- NULL for usage rows
    external_transaction_id TEXT,      -- PayPal order id for purchase rows
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_token_transactions_user ON token_transactions(user_id, id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_token_transactions_external
    ON token_transactions(external_transaction_id);
"#;
