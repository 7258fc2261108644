//! CLI integration tests for calcmeter admin commands.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::Path;

use assert_cmd::Command;
use assert_fs::TempDir;
use chrono::{NaiveDate, TimeZone, Utc};
use calcmeter::store::{SqliteStore, Store};
use calcmeter::types::UserTokenBalance;
use predicates::prelude::*;
use serde_json::Value;

const SECRET_VARS: [&str; 7] = [
    "USERS_SERVICE_API_URL",
    "USERS_SERVICE_API_KEY",
    "PAYPAL_CLIENT_ID",
    "PAYPAL_CLIENT_SECRET",
    "PAYPAL_API_BASE",
    "CALCMETER_CONFIG",
    "CALCMETER_DATA_DIR",
];

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    fn data_dir_str(&self) -> String {
        self.data_dir().to_string_lossy().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("calcmeter").expect("failed to find binary");
        cmd.env("NO_COLOR", "1");
        for var in SECRET_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    fn init(&self) -> assert_cmd::assert::Assert {
        self.cmd()
            .args(["admin", "init", "--data-dir", &self.data_dir_str()])
            .assert()
    }

    fn store(&self) -> SqliteStore {
        SqliteStore::new(self.data_dir().join("calcmeter.db")).expect("open store")
    }

    /// Seeds a balance of 10 and records two usages and one purchase.
    fn seed_ledger(&self, user_id: &str) {
        let store = self.store();
        let now = Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap();
        store
            .create_balance(&UserTokenBalance {
                user_id: user_id.to_string(),
                token_count: 10,
                last_refresh_date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
                updated_at: now,
            })
            .unwrap();
        store.debit_token(user_id, now).unwrap();
        store.debit_token(user_id, now).unwrap();
        store
            .credit_purchase(user_id, 75, 5.0, "ORDER0001", now)
            .unwrap();
    }
}

#[test]
fn test_init_creates_database() {
    let ctx = TestContext::new();
    ctx.init()
        .success()
        .stdout(predicate::str::contains("Initialized database"));

    assert!(ctx.data_dir().join("calcmeter.db").exists());
}

#[test]
fn test_init_is_idempotent() {
    let ctx = TestContext::new();
    ctx.init().success();
    ctx.init()
        .success()
        .stdout(predicate::str::contains("already initialized"));
}

#[test]
fn test_balance_requires_init() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args([
            "admin",
            "balance",
            "--data-dir",
            &ctx.data_dir_str(),
            "--user-id",
            "student-1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("admin init"));
}

#[test]
fn test_balance_for_unknown_user() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.cmd()
        .args([
            "admin",
            "balance",
            "--data-dir",
            &ctx.data_dir_str(),
            "--user-id",
            "nobody",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No balance recorded for 'nobody'"));
}

#[test]
fn test_balance_shows_stored_row() {
    let ctx = TestContext::new();
    ctx.init().success();
    ctx.seed_ledger("student-1");

    ctx.cmd()
        .args([
            "admin",
            "balance",
            "--data-dir",
            &ctx.data_dir_str(),
            "--user-id",
            "student-1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tokens:       83"))
        .stdout(predicate::str::contains("2026-05-04"));
}

#[test]
fn test_ledger_json_lists_newest_first() {
    let ctx = TestContext::new();
    ctx.init().success();
    ctx.seed_ledger("student-1");

    let output = ctx
        .cmd()
        .args([
            "admin",
            "ledger",
            "--data-dir",
            &ctx.data_dir_str(),
            "--user-id",
            "student-1",
            "--json",
        ])
        .output()
        .expect("run ledger");
    assert!(output.status.success());

    let rows: Value = serde_json::from_slice(&output.stdout).expect("parse ledger json");
    let rows = rows.as_array().expect("array");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["transaction_type"], "purchase");
    assert_eq!(rows[0]["token_amount"], 75);
    assert_eq!(rows[0]["external_transaction_id"], "ORDER0001");
    assert_eq!(rows[1]["transaction_type"], "usage");
    assert_eq!(rows[1]["token_amount"], -1);
}

#[test]
fn test_ledger_table_output() {
    let ctx = TestContext::new();
    ctx.init().success();
    ctx.seed_ledger("student-1");

    ctx.cmd()
        .args([
            "admin",
            "ledger",
            "--data-dir",
            &ctx.data_dir_str(),
            "--user-id",
            "student-1",
            "--limit",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("purchase"))
        .stdout(predicate::str::contains("5.00"))
        .stdout(predicate::str::contains("usage").not());
}

#[test]
fn test_ledger_empty() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.cmd()
        .args([
            "admin",
            "ledger",
            "--data-dir",
            &ctx.data_dir_str(),
            "--user-id",
            "student-1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions for 'student-1'"));
}

#[test]
fn test_serve_refuses_to_start_without_secrets() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["serve", "--data-dir", &ctx.data_dir_str(), "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required settings"))
        .stderr(predicate::str::contains("paypal.client_secret"));
}

#[test]
fn test_serve_rejects_unreadable_config() {
    let ctx = TestContext::new();
    let config = ctx.data_dir().join("calcmeter.toml");
    std::fs::write(&config, "port = \"eighty\"").unwrap();

    ctx.cmd()
        .args(["serve", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}
