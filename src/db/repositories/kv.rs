use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::Database;

fn write_entries(conn: &mut Connection, entries: &[(String, String)]) -> Result<()> {
    let updated_at = Utc::now().to_rfc3339();
    let tx = conn
        .transaction()
        .context("failed to open key-value transaction")?;
    for (key, value) in entries {
        tx.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, updated_at],
        )
        .with_context(|| format!("failed to write key {key}"))?;
    }
    tx.commit().context("failed to commit key-value write")?;
    Ok(())
}

impl Database {
    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.execute(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .with_context(|| format!("failed to read key {key}"))?;
            Ok(value)
        })
        .await
    }

    /// Writes all entries in one transaction and waits for the commit.
    pub async fn put_values(&self, entries: Vec<(String, String)>) -> Result<()> {
        self.execute(move |conn| write_entries(conn, &entries)).await
    }

    /// Queues a write of all entries without waiting for it.
    pub fn submit_values(&self, entries: Vec<(String, String)>) -> Result<()> {
        self.submit("key-value write", move |conn| write_entries(conn, &entries))
    }
}
