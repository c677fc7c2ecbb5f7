//! Forward-only schema migrations.
//!
//! Every applied migration leaves a row in `foodorder_migrations`. Each one
//! runs in its own transaction, so a failure keeps the database at the last
//! version that applied cleanly.

use crate::error::{Result, StoreError};
use rusqlite::{params, Connection};
use tracing::{debug, info};

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create orders",
        sql: include_str!("../migrations/001_init.sql"),
    },
    Migration {
        version: 2,
        name: "add orders.username",
        sql: include_str!("../migrations/002_add_username.sql"),
    },
];

const HISTORY_TABLE: &str = "CREATE TABLE IF NOT EXISTS foodorder_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
);";

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(HISTORY_TABLE)?;
    let current = schema_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(StoreError::Migration(format!(
            "database is at version {current}, this build knows up to {latest}"
        )));
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        debug!(version = migration.version, name = migration.name, "applying migration");
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.sql).map_err(|err| {
            StoreError::Migration(format!(
                "migration {} ({}) failed: {err}",
                migration.version, migration.name
            ))
        })?;
        tx.execute(
            "INSERT INTO foodorder_migrations (version, name) VALUES (?1, ?2);",
            params![migration.version, migration.name],
        )?;
        tx.commit()?;
        info!(version = migration.version, "schema migrated");
    }
    Ok(())
}

/// Highest applied migration, `0` for a fresh database.
pub fn schema_version(conn: &Connection) -> Result<i64> {
    let has_history: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'foodorder_migrations');",
        [],
        |row| row.get(0),
    )?;
    if !has_history {
        return Ok(0);
    }
    let version: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM foodorder_migrations;", [], |row| {
            row.get(0)
        })?;
    Ok(version.unwrap_or(0))
}

pub fn latest_version() -> i64 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}
