//! Full-database JSON snapshots
//!
//! A snapshot holds every user, policy, claim and notification with its
//! original id. Export reads all four tables in one read transaction; restore
//! validates the whole document first, then replaces the database contents in
//! one write transaction, deleting children before parents and inserting
//! parents before children.
//!
//! Files live in one directory: `backup_<YYYYMMDD_HHMMSS>.json` per capture
//! plus `latest_backup.json`, which restore reads by default.

mod engine;
pub mod format;

pub use engine::{load_document, BackupEntry, BackupManager, BackupOutcome, RestoreOutcome};
pub use format::{
    BackupDocument, ClaimRecord, EntityCounts, NotificationRecord, PolicyRecord, UserRecord,
    FORMAT_VERSION, TIMESTAMP_FORMAT,
};
