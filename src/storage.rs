// 🗄️ Storage - string key/value preferences
//
// The ledger is persisted as two string entries. A missing key is reported as
// None and the caller treats it as "". Both entries are written together with
// `set_many` so a failed save never leaves one list ahead of the other.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// Default namespace, the equivalent of a preferences file name
pub const DEFAULT_NAMESPACE: &str = "money_manager";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value for `key` (last writer wins)
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Overwrite several entries at once. On error none of them are written.
    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()>;
}

const UPSERT_SQL: &str = "INSERT INTO preferences (namespace, key, value, updated_at)
     VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
     ON CONFLICT(namespace, key)
     DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

// ============================================================================
// SQLITE BACKEND
// ============================================================================

pub struct SqliteStore {
    conn: Connection,
    namespace: String,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P, namespace: &str) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("Failed to open database: {:?}", path.as_ref()))?;
        Self::from_connection(conn, namespace)
    }

    pub fn open_in_memory(namespace: &str) -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn, namespace)
    }

    pub fn from_connection(conn: Connection, namespace: &str) -> Result<Self> {
        setup_database(&conn)?;
        Ok(SqliteStore {
            conn,
            namespace: namespace.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL for crash safety of the single writer
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS preferences (
            namespace TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (namespace, key)
        )",
        [],
    )
    .context("Failed to create preferences table")?;

    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read preference '{}'", key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(UPSERT_SQL, params![self.namespace, key, value])
            .with_context(|| format!("Failed to write preference '{}'", key))?;
        Ok(())
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        // Dropping the transaction without commit rolls every upsert back
        let tx = self
            .conn
            .transaction()
            .context("Failed to begin preferences transaction")?;
        for (key, value) in entries {
            tx.execute(UPSERT_SQL, params![self.namespace, key, value])
                .with_context(|| format!("Failed to write preference '{}'", key))?;
        }
        tx.commit().context("Failed to commit preferences")?;
        Ok(())
    }
}

// ============================================================================
// IN-MEMORY BACKEND
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, handy for loading fixtures
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MemoryStore {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
