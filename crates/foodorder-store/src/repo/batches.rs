use crate::error::Result;
use foodorder_core::domain::{BatchId, LatestBatch, RawOrder, StoredBatch};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

const BATCH_COLUMNS: &str = "id, title, survey_data, created_at, archived, username";

/// Append-only access to uploaded order batches.
pub struct BatchesRepo<'a> {
    conn: &'a Connection,
}

impl<'a> BatchesRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Stores the rows exactly as given. Callers validate beforehand.
    pub fn add(&self, now_utc: i64, orders: &[RawOrder], username: Option<&str>) -> Result<BatchId> {
        let payload = serde_json::to_string(orders)?;
        let username = username.map(str::trim).filter(|name| !name.is_empty());
        self.conn.execute(
            "INSERT INTO orders (survey_data, created_at, username) VALUES (?1, ?2, ?3);",
            params![payload, now_utc, username],
        )?;
        let id = BatchId(self.conn.last_insert_rowid());
        debug!(%id, rows = orders.len(), "batch stored");
        Ok(id)
    }

    /// All batches, newest first.
    pub fn list(&self) -> Result<Vec<StoredBatch>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {BATCH_COLUMNS} FROM orders ORDER BY id DESC;"))?;
        let mut rows = stmt.query([])?;
        let mut batches = Vec::new();
        while let Some(row) = rows.next()? {
            batches.push(batch_from_row(row)?);
        }
        Ok(batches)
    }

    pub fn latest(&self) -> Result<Option<LatestBatch>> {
        let row: Option<(String, i64, Option<String>)> = self
            .conn
            .query_row(
                "SELECT survey_data, created_at, username FROM orders ORDER BY id DESC LIMIT 1;",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        match row {
            Some((payload, created_at, username)) => Ok(Some(LatestBatch {
                survey_data: serde_json::from_str(&payload)?,
                created_at,
                username,
            })),
            None => Ok(None),
        }
    }

    pub fn get(&self, id: BatchId) -> Result<Option<StoredBatch>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {BATCH_COLUMNS} FROM orders WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.as_i64()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(batch_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM orders;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn batch_from_row(row: &rusqlite::Row<'_>) -> Result<StoredBatch> {
    let payload: String = row.get(2)?;
    let archived: i64 = row.get(4)?;
    Ok(StoredBatch {
        id: BatchId(row.get(0)?),
        title: row.get(1)?,
        survey_data: serde_json::from_str(&payload)?,
        created_at: row.get(3)?,
        archived: archived != 0,
        username: row.get(5)?,
    })
}
