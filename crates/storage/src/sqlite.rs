//! SQLite principal store implementation.

use crate::{Error, Permissions, Principal, PrincipalRecord, PrincipalStore, Result};
use rusqlite::{Connection, params};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// SQLite-backed principal store.
pub struct SqliteStore {
    conn: Connection,
}

/// One row of the `principals` table.
#[derive(Debug, Deserialize)]
struct PrincipalRow {
    username: String,
    password: String,
    expiry_date: String,
    permissions: String,
}

impl SqliteStore {
    /// Open or create a principal store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory principal store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS principals (
                username TEXT PRIMARY KEY,
                password TEXT NOT NULL,
                expiry_date TEXT NOT NULL,
                permissions TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Insert or replace a principal.
    ///
    /// This is the administrative write path; evaluation never writes.
    pub fn upsert(&self, principal: &Principal) -> Result<()> {
        principal.check_grants()?;
        let record = principal.to_record();
        self.conn.execute(
            "INSERT INTO principals (username, password, expiry_date, permissions)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(username) DO UPDATE SET
                password = excluded.password,
                expiry_date = excluded.expiry_date,
                permissions = excluded.permissions",
            params![
                principal.username,
                record.password,
                record.expiry_date,
                record.permissions.joined(),
            ],
        )?;
        debug!(username = %principal.username, "upserted principal");
        Ok(())
    }

    /// Insert a raw row without validating it.
    #[cfg(test)]
    fn insert_raw(
        &self,
        username: &str,
        password: &dyn rusqlite::ToSql,
        expiry: &str,
        perms: &str,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO principals (username, password, expiry_date, permissions)
             VALUES (?1, ?2, ?3, ?4)",
            params![username, password, expiry, perms],
        )?;
        Ok(())
    }
}

impl PrincipalStore for SqliteStore {
    fn lookup(&self, username: &str) -> Result<Option<Principal>> {
        let mut stmt = self.conn.prepare(
            "SELECT username, password, expiry_date, permissions FROM principals
             WHERE username = ?1",
        )?;
        let mut rows = stmt.query([username])?;

        let Some(row) = rows.next()? else {
            debug!(username, "principal not found");
            return Ok(None);
        };

        let row: PrincipalRow =
            serde_rusqlite::from_row(row).map_err(|e| Error::MalformedRecord {
                username: username.to_string(),
                reason: e.to_string(),
            })?;
        let record = PrincipalRecord {
            password: row.password,
            expiry_date: row.expiry_date,
            permissions: Permissions::Joined(row.permissions),
        };
        record.into_principal(row.username).map(Some)
    }
}
