//! Connection setup

use std::path::Path;

use rusqlite::Connection;

use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;

/// Open (creating if needed) the database file, configure it and bring the
/// schema up to date
///
/// # Errors
/// Persistence errors from SQLite or a failed migration.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let mut conn = Connection::open(path).map_err(from_rusqlite)?;
    configure(&conn)?;
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(from_rusqlite)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}

/// Migrated in-memory database
///
/// # Errors
/// Persistence errors from SQLite or a failed migration.
pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory().map_err(from_rusqlite)?;
    configure(&conn)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}

/// Enable foreign key enforcement
///
/// # Errors
/// Persistence error if the pragma is rejected.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = open_in_memory().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_file_database_uses_wal() {
        let dir = TempDir::new().unwrap();
        let conn = open(dir.path().join("tracker.db")).unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
