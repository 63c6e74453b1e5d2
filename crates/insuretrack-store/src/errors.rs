//! Store-side constructors for `ExError`

use insuretrack_core::errors::{ExError, ExErrorKind};

pub type Result<T> = std::result::Result<T, ExError>;

pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::ConstraintViolation)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// SQLite constraint failures keep their own kind so callers can tell a
/// violated UNIQUE or FOREIGN KEY from an I/O-level failure.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            ExErrorKind::ConstraintViolation
        }
        _ => ExErrorKind::Persistence,
    };
    ExError::new(kind).with_op("sqlite").with_message(err.to_string())
}

pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    let kind = if err.kind() == std::io::ErrorKind::NotFound {
        ExErrorKind::NotFound
    } else {
        ExErrorKind::Io
    };
    ExError::new(kind)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

pub fn serialization_error(operation: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

pub fn invalid_snapshot(field: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidSnapshot)
        .with_op("restore_data")
        .with_field(field)
        .with_message(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_maps_to_constraint_kind() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (x TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .map_err(from_rusqlite)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    }

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(io_error("read", io).kind(), ExErrorKind::NotFound);
    }
}
