//! InsureTrack store
//!
//! SQLite persistence for users, policies, claims and notifications:
//! - embedded, checksummed schema migrations
//! - per-entity repositories with explicit, ordered cascade deletes
//! - the JSON backup/restore engine
//! - on-disk storage for claim documents

mod atomic;
pub mod backup;
pub mod db;
pub mod documents;
pub mod errors;
pub mod migrations;
pub mod repo;

pub use backup::{BackupEntry, BackupManager, BackupOutcome, RestoreOutcome};
pub use documents::DocumentStore;
pub use errors::Result;
