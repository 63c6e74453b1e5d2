use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use insuretrack_core::errors::ExErrorKind;
use rusqlite::{Connection, TransactionBehavior};

use super::format::{BackupDocument, EntityCounts, FORMAT_VERSION, TIMESTAMP_FORMAT};
use crate::atomic::atomic_write;
use crate::errors::{from_rusqlite, io_error, serialization_error, Result};
use crate::repo::{ClaimRepo, NotificationRepo, PolicyRepo, UserRepo};

const LATEST_BACKUP: &str = "latest_backup.json";
const HISTORY_PREFIX: &str = "backup_";
const HISTORY_SUFFIX: &str = ".json";

/// Result of a successful export
#[derive(Debug, Clone, PartialEq)]
pub struct BackupOutcome {
    /// The timestamped history file
    pub path: PathBuf,
    pub timestamp: String,
    pub counts: EntityCounts,
}

/// Result of a successful restore
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreOutcome {
    pub source: PathBuf,
    /// Capture stamp recorded in the document
    pub timestamp: String,
    pub counts: EntityCounts,
}

/// One history file found by [`BackupManager::list_backups`]
#[derive(Debug, Clone, PartialEq)]
pub struct BackupEntry {
    pub filename: String,
    pub path: PathBuf,
    /// From the filename stamp, or the file's mtime if the stamp is unreadable
    pub captured_at: NaiveDateTime,
    pub size_bytes: u64,
}

/// Exports, restores and lists snapshots in one backup directory
#[derive(Debug, Clone)]
pub struct BackupManager {
    backup_dir: PathBuf,
}

impl BackupManager {
    /// The directory is created by the first export.
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn latest_path(&self) -> PathBuf {
        self.backup_dir.join(LATEST_BACKUP)
    }

    /// Export the whole database, stamped with the current UTC time
    ///
    /// # Errors
    /// Persistence, serialization or I/O failures.
    pub fn backup_data(&self, conn: &mut Connection) -> Result<BackupOutcome> {
        self.backup_data_at(conn, Utc::now().naive_utc())
    }

    /// Export the whole database, stamped with `captured_at`
    ///
    /// Writes `backup_<stamp>.json` and replaces `latest_backup.json` with the
    /// same content. A second export within the same second overwrites the
    /// history file.
    ///
    /// # Errors
    /// Persistence, serialization or I/O failures.
    pub fn backup_data_at(
        &self,
        conn: &mut Connection,
        captured_at: NaiveDateTime,
    ) -> Result<BackupOutcome> {
        let timestamp = captured_at.format(TIMESTAMP_FORMAT).to_string();
        let document = capture(conn, timestamp.clone())?;
        let counts = document.counts();

        let json = serde_json::to_vec_pretty(&document)
            .map_err(|e| serialization_error("backup_data", e))?;

        let path = self
            .backup_dir
            .join(format!("{}{}{}", HISTORY_PREFIX, timestamp, HISTORY_SUFFIX));
        atomic_write(&path, &json)?;
        atomic_write(&self.latest_path(), &json)?;

        tracing::debug!(
            backup_file = %path.display(),
            users = counts.users,
            policies = counts.policies,
            claims = counts.claims,
            notifications = counts.notifications,
            "Wrote snapshot"
        );

        Ok(BackupOutcome {
            path,
            timestamp,
            counts,
        })
    }

    /// Replace the database contents with a snapshot
    ///
    /// `file` defaults to `latest_backup.json`. The document is parsed and
    /// validated before anything is deleted; the delete and re-insert run in
    /// one transaction, so on any error the database is unchanged.
    ///
    /// # Errors
    /// - `NotFound` if the file does not exist
    /// - `Serialization` if it is not a well-formed snapshot
    /// - `InvalidSnapshot` if it fails validation
    /// - `Persistence`/`ConstraintViolation` if the write fails
    pub fn restore_data(&self, conn: &mut Connection, file: Option<&Path>) -> Result<RestoreOutcome> {
        let source = file.map_or_else(|| self.latest_path(), Path::to_path_buf);
        let document = load_document(&source)?;
        document.validate()?;

        let counts = document.counts();
        let timestamp = document.timestamp.clone();

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(from_rusqlite)?;

        for table in ["notifications", "claims", "policies", "users"] {
            tx.execute(&format!("DELETE FROM {}", table), [])
                .map_err(from_rusqlite)?;
        }

        for user in document.users {
            UserRepo::insert_with_id(&tx, &user.into())?;
        }
        for policy in document.policies {
            PolicyRepo::insert_with_id(&tx, &policy.into())?;
        }
        for claim in document.claims {
            ClaimRepo::insert_with_id(&tx, &claim.into())?;
        }
        for notification in document.notifications {
            NotificationRepo::insert_with_id(&tx, &notification.into())?;
        }

        tx.commit().map_err(from_rusqlite)?;

        tracing::debug!(backup_file = %source.display(), "Restored snapshot");

        Ok(RestoreOutcome {
            source,
            timestamp,
            counts,
        })
    }

    /// History files, newest capture first. A missing directory is empty.
    ///
    /// # Errors
    /// I/O failures while scanning an existing directory.
    pub fn list_backups(&self) -> Result<Vec<BackupEntry>> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list_backups", e)),
        };

        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error("list_backups", e))?;
            let filename = entry.file_name().to_string_lossy().into_owned();
            let Some(stamp) = filename
                .strip_prefix(HISTORY_PREFIX)
                .and_then(|rest| rest.strip_suffix(HISTORY_SUFFIX))
            else {
                continue;
            };

            let metadata = entry.metadata().map_err(|e| io_error("list_backups", e))?;
            if !metadata.is_file() {
                continue;
            }

            let captured_at = match NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT) {
                Ok(at) => at,
                Err(_) => {
                    let modified = metadata
                        .modified()
                        .map_err(|e| io_error("list_backups", e))?;
                    DateTime::<Utc>::from(modified).naive_utc()
                }
            };

            backups.push(BackupEntry {
                path: entry.path(),
                filename,
                captured_at,
                size_bytes: metadata.len(),
            });
        }

        backups.sort_by(|a, b| {
            b.captured_at
                .cmp(&a.captured_at)
                .then_with(|| b.filename.cmp(&a.filename))
        });
        Ok(backups)
    }
}

/// Read and parse a snapshot file without validating it
///
/// # Errors
/// `NotFound` for a missing file, `Io` for any other read failure,
/// `Serialization` for malformed content.
pub fn load_document(path: &Path) -> Result<BackupDocument> {
    let bytes = fs::read(path).map_err(|e| {
        let err = io_error("restore_data", e);
        let message = if err.kind() == ExErrorKind::NotFound {
            format!("Backup file not found: {}", path.display())
        } else {
            format!("Cannot read backup file {}: {}", path.display(), err.message())
        };
        err.with_message(message)
    })?;
    serde_json::from_slice(&bytes).map_err(|e| serialization_error("restore_data", e))
}

/// Read every table inside one read transaction
fn capture(conn: &mut Connection, timestamp: String) -> Result<BackupDocument> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Deferred)
        .map_err(from_rusqlite)?;

    let document = BackupDocument {
        format_version: FORMAT_VERSION,
        timestamp,
        users: UserRepo::all(&tx)?.into_iter().map(Into::into).collect(),
        policies: PolicyRepo::all(&tx)?.into_iter().map(Into::into).collect(),
        claims: ClaimRepo::all(&tx)?.into_iter().map(Into::into).collect(),
        notifications: NotificationRepo::all(&tx)?
            .into_iter()
            .map(Into::into)
            .collect(),
    };

    tx.commit().map_err(from_rusqlite)?;
    Ok(document)
}
