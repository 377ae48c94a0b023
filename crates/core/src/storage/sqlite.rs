//! SQLite persistence for identities and pastes.
//!
//! - WAL journal for durability under concurrent readers
//! - `identities.public_key` carries a UNIQUE constraint, the last line of
//!   defence behind the registry's duplicate check
//! - `pastes.seq` records creation order for listings
//! - Each trait call is a single statement; no cross-row transactions

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, ErrorCode, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info};

use super::{IdentityStore, PasteContent, PasteStore};
use crate::error::{StorageError, StorageResult};
use crate::types::{Identity, Paste};

const IDENTITIES: &str = "identities";
const PASTES: &str = "pastes";

/// SQLite-backed store shared by the registry and the content store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Create or open a database at the specified path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();

        info!(path = %path.display(), "Opening paste database");

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database. Contents vanish on drop.
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS identities (
                id TEXT PRIMARY KEY,
                public_key TEXT NOT NULL UNIQUE,
                created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            );

            CREATE TABLE IF NOT EXISTS pastes (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                ciphertext TEXT NOT NULL,
                signature TEXT NOT NULL,
                public_key TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_pastes_public_key ON pastes(public_key);
            "#,
        )?;

        Ok(())
    }

    /// Path of the backing file, `None` for in-memory databases.
    pub fn db_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    fn identity_where(&self, column: &'static str, value: &str) -> StorageResult<Identity> {
        let conn = self.lock()?;
        let sql = format!("SELECT id, public_key FROM identities WHERE {column} = ?1");

        conn.query_row(&sql, [value], |row| {
            Ok(Identity {
                id: row.get(0)?,
                public_key: row.get(1)?,
            })
        })
        .optional()
        .map_err(|e| log_db_error("identity_lookup", e, IDENTITIES))?
        .ok_or_else(|| StorageError::NotFound {
            table: IDENTITIES,
            key: column.to_string(),
        })
    }

    /// Execute raw SQL. Only for tests that need to corrupt or age records.
    #[doc(hidden)]
    pub fn __test_execute_raw_sql(&self, sql: &str) -> StorageResult<usize> {
        let conn = self.lock()?;
        Ok(conn.execute(sql, [])?)
    }
}

impl IdentityStore for SqliteStore {
    fn insert_identity(&self, identity: &Identity) -> StorageResult<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO identities (id, public_key) VALUES (?1, ?2)",
            params![identity.id, identity.public_key],
        )
        .map_err(|e| log_db_error("insert_identity", e, IDENTITIES))?;

        debug!(identity_id = %identity.id, "Identity inserted");
        Ok(())
    }

    fn identity_by_id(&self, id: &str) -> StorageResult<Identity> {
        self.identity_where("id", id)
    }

    fn identity_by_public_key(&self, public_key: &str) -> StorageResult<Identity> {
        self.identity_where("public_key", public_key)
    }
}

impl PasteStore for SqliteStore {
    fn insert_paste(&self, paste: &Paste) -> StorageResult<()> {
        let conn = self.lock()?;

        conn.execute(
            r#"
            INSERT INTO pastes (id, ciphertext, signature, public_key, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                paste.id,
                paste.ciphertext,
                paste.signature,
                paste.public_key,
                paste.expires_at.timestamp(),
            ],
        )
        .map_err(|e| log_db_error("insert_paste", e, PASTES))?;

        debug!(paste_id = %paste.id, "Paste inserted");
        Ok(())
    }

    fn paste_by_id(&self, id: &str) -> StorageResult<Paste> {
        let conn = self.lock()?;

        let raw = conn
            .query_row(
                r#"
                SELECT id, ciphertext, signature, public_key, expires_at
                FROM pastes
                WHERE id = ?1
                "#,
                [id],
                RawPaste::from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StorageError::NotFound {
                    table: PASTES,
                    key: id.to_string(),
                },
                e => log_db_error("paste_by_id", e, PASTES),
            })?;

        raw.into_paste()
    }

    fn pastes_by_public_key(&self, public_key: &str) -> StorageResult<Vec<Paste>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, ciphertext, signature, public_key, expires_at
            FROM pastes
            WHERE public_key = ?1
            ORDER BY seq ASC
            "#,
        )?;

        let rows = stmt
            .query_map([public_key], RawPaste::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| log_db_error("pastes_by_public_key", e, PASTES))?;

        rows.into_iter().map(RawPaste::into_paste).collect()
    }

    fn update_paste_content(&self, id: &str, content: &PasteContent) -> StorageResult<()> {
        let conn = self.lock()?;

        let changed = conn
            .execute(
                r#"
                UPDATE pastes
                SET ciphertext = ?1, signature = ?2, public_key = ?3
                WHERE id = ?4
                "#,
                params![content.ciphertext, content.signature, content.public_key, id],
            )
            .map_err(|e| log_db_error("update_paste_content", e, PASTES))?;

        if changed == 0 {
            return Err(StorageError::NotFound {
                table: PASTES,
                key: id.to_string(),
            });
        }

        debug!(paste_id = %id, "Paste content replaced");
        Ok(())
    }
}

/// Row as stored, before the expiry column is turned back into a timestamp.
struct RawPaste {
    id: String,
    ciphertext: String,
    signature: String,
    public_key: String,
    expires_at: i64,
}

impl RawPaste {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            ciphertext: row.get(1)?,
            signature: row.get(2)?,
            public_key: row.get(3)?,
            expires_at: row.get(4)?,
        })
    }

    fn into_paste(self) -> StorageResult<Paste> {
        let expires_at: DateTime<Utc> = Utc
            .timestamp_opt(self.expires_at, 0)
            .single()
            .ok_or_else(|| StorageError::Corrupt {
                table: PASTES,
                reason: format!("expires_at out of range for paste {}", self.id),
            })?;

        Ok(Paste {
            id: self.id,
            ciphertext: self.ciphertext,
            signature: self.signature,
            public_key: self.public_key,
            expires_at,
        })
    }
}

fn log_db_error(operation: &'static str, err: rusqlite::Error, table: &'static str) -> StorageError {
    if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
        if failure.code == ErrorCode::ConstraintViolation {
            debug!(operation, table, "Unique constraint rejected write");
            return StorageError::Conflict { table };
        }
    }

    error!(operation, table, error = %err, "Database operation failed");
    StorageError::Database(err)
}
