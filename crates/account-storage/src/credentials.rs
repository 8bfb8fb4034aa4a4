//! Credential key-value store

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::database::Database;
use crate::error::StorageError;
use crate::Result;

/// Keys of the persisted session fields
pub mod keys {
    pub const USERNAME: &str = "username";
    pub const SESSION_TOKEN: &str = "session_token";
    /// Epoch millis, `0` means unset
    pub const LOGIN_TIME: &str = "login_time";
}

/// Application-scoped durable key-value store.
///
/// Writing `None` deletes the key.
pub struct CredentialStore {
    db: Database,
}

impl CredentialStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.db.with_connection(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM credentials WHERE key = ?1",
                    [key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    /// Numeric read; an absent key reads as `0`
    pub fn get_i64(&self, key: &str) -> Result<i64> {
        match self.get(key)? {
            None => Ok(0),
            Some(value) => value
                .trim()
                .parse::<i64>()
                .map_err(|_| StorageError::InvalidValue {
                    key: key.to_string(),
                    value,
                }),
        }
    }

    pub fn set(&self, key: &str, value: Option<&str>) -> Result<()> {
        self.db.with_connection(|conn| write_entry(conn, key, value))
    }

    /// Write several keys in one transaction
    pub fn set_many(&self, entries: &[(&str, Option<&str>)]) -> Result<()> {
        self.db.transaction(|conn| {
            for (key, value) in entries {
                write_entry(conn, key, *value)?;
            }
            Ok(())
        })?;

        tracing::debug!(count = entries.len(), "Committed credential entries");
        Ok(())
    }
}

impl Clone for CredentialStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

fn write_entry(conn: &Connection, key: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(value) => {
            let updated_at = Utc::now().to_rfc3339();
            conn.execute(
                "INSERT OR REPLACE INTO credentials (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, updated_at],
            )?;
        }
        None => {
            conn.execute("DELETE FROM credentials WHERE key = ?1", [key])?;
        }
    }
    Ok(())
}
