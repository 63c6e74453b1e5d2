//! Explicit per-process context handed to every command

use chrono::{NaiveDateTime, Utc};
use insuretrack_core::{AccessPolicy, Action, Actor, AppConfig, RoleAccessPolicy};
use insuretrack_store::errors::Result;
use insuretrack_store::{BackupManager, DocumentStore};
use rusqlite::Connection;

/// Configuration plus the long-lived helpers built from it
pub struct Services {
    pub config: AppConfig,
    pub backups: BackupManager,
    pub documents: DocumentStore,
    pub access: Box<dyn AccessPolicy>,
}

impl Services {
    /// Services with the standard role matrix
    pub fn new(config: AppConfig) -> Self {
        Self {
            backups: BackupManager::new(config.backup_dir.clone()),
            documents: DocumentStore::new(config.upload_dir.clone(), config.max_upload_bytes),
            access: Box::new(RoleAccessPolicy),
            config,
        }
    }

    pub fn with_access_policy(mut self, access: impl AccessPolicy + 'static) -> Self {
        self.access = Box::new(access);
        self
    }

    /// # Errors
    /// `Forbidden` when the access policy refuses the action.
    pub fn authorize(&self, actor: &Actor, action: &Action<'_>) -> Result<()> {
        self.access.check(actor, action)
    }

    /// Snapshot the database after a committed mutation when configured to.
    ///
    /// The mutation has already been committed, so a failed snapshot is
    /// logged and does not fail the command.
    pub(crate) fn backup_after_write(&self, op: &str, conn: &mut Connection) {
        if !self.config.backup_on_write {
            return;
        }
        match self.backups.backup_data(conn) {
            Ok(outcome) => tracing::debug!(
                op,
                backup_file = %outcome.path.display(),
                "Automatic backup written"
            ),
            Err(e) => tracing::warn!(
                op,
                err_code = e.code(),
                message = e.message(),
                "Automatic backup failed"
            ),
        }
    }
}

/// Current UTC wall-clock time, as stored in every timestamp column
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub(crate) fn elapsed_ms(start: std::time::Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
