//! Database connection management.
//!
//! Wraps a single rusqlite Connection in a Mutex. WAL mode and foreign
//! keys are configured on open, and pending migrations run before the
//! handle is returned.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use concierge_core::error::ConciergeError;

use crate::migrations;

/// Thread-safe SQLite database handle.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a database at the given path and run migrations.
    pub fn new(path: &Path) -> Result<Self, ConciergeError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| ConciergeError::Storage(format!("Failed to open database: {}", e)))?;
        let db = Self::configure(conn)?;
        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory() -> Result<Self, ConciergeError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ConciergeError::Storage(format!("Failed to open in-memory db: {}", e)))?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self, ConciergeError> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(|e| ConciergeError::Storage(format!("Failed to set pragmas: {}", e)))?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(migrations::run_migrations)?;
        Ok(db)
    }

    /// Execute a closure with a reference to the underlying connection.
    /// The mutex is held for the duration of the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ConciergeError>
    where
        F: FnOnce(&Connection) -> Result<T, ConciergeError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConciergeError::Storage(format!("Database lock poisoned: {}", e)))?;
        f(&conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_database_opens() {
        let db = Database::in_memory().unwrap();
        let count: i64 = db
            .with_conn(|conn| {
                conn.query_row("SELECT COUNT(*) FROM hotels", [], |row| row.get(0))
                    .map_err(|e| ConciergeError::Storage(e.to_string()))
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_file_database_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("concierge.db");
        let db = Database::new(&path).unwrap();
        drop(db);
        assert!(path.exists());
    }

    #[test]
    fn test_with_conn_propagates_errors() {
        let db = Database::in_memory().unwrap();
        let result: Result<(), ConciergeError> =
            db.with_conn(|_| Err(ConciergeError::Storage("boom".to_string())));
        assert!(result.is_err());
    }
}
