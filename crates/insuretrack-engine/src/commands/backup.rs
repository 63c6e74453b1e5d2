//! Admin backup commands over [`insuretrack_store::BackupManager`]

use std::path::Path;
use std::time::Instant;

use insuretrack_core::{log_op_end, log_op_error, log_op_start, Action, Actor};
use insuretrack_store::errors::Result;
use insuretrack_store::{BackupEntry, BackupOutcome, RestoreOutcome};
use rusqlite::Connection;

use super::context::{elapsed_ms, Services};

/// Write a snapshot to the configured backup directory
///
/// # Errors
/// `Forbidden` for non-admins; persistence, serialization or I/O failures.
pub fn create_backup(actor: &Actor, conn: &mut Connection, services: &Services) -> Result<BackupOutcome> {
    log_op_start!("backup_data", actor_id = actor.user_id);
    let start = Instant::now();

    let outcome = services
        .authorize(actor, &Action::ManageBackups)
        .and_then(|()| services.backups.backup_data(conn))
        .map_err(|e| {
            log_op_error!("backup_data", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "backup_data",
        duration_ms = elapsed_ms(start),
        backup_file = %outcome.path.display(),
        users = outcome.counts.users,
        policies = outcome.counts.policies,
        claims = outcome.counts.claims,
        notifications = outcome.counts.notifications
    );
    Ok(outcome)
}

/// Replace all data with a snapshot; `file` defaults to the latest one
///
/// # Errors
/// `Forbidden` for non-admins; otherwise whatever
/// [`insuretrack_store::BackupManager::restore_data`] reports, in which case
/// the database is unchanged.
pub fn restore_backup(
    actor: &Actor,
    file: Option<&Path>,
    conn: &mut Connection,
    services: &Services,
) -> Result<RestoreOutcome> {
    log_op_start!("restore_data", actor_id = actor.user_id);
    let start = Instant::now();

    let outcome = services
        .authorize(actor, &Action::ManageBackups)
        .and_then(|()| services.backups.restore_data(conn, file))
        .map_err(|e| {
            log_op_error!("restore_data", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "restore_data",
        duration_ms = elapsed_ms(start),
        backup_file = %outcome.source.display(),
        backup_timestamp = outcome.timestamp.as_str()
    );
    Ok(outcome)
}

/// History snapshots, newest first
///
/// # Errors
/// `Forbidden` for non-admins; I/O failures while scanning.
pub fn list_backups(actor: &Actor, services: &Services) -> Result<Vec<BackupEntry>> {
    log_op_start!("list_backups", actor_id = actor.user_id);
    let start = Instant::now();

    let backups = services
        .authorize(actor, &Action::ManageBackups)
        .and_then(|()| services.backups.list_backups())
        .map_err(|e| {
            log_op_error!("list_backups", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!("list_backups", duration_ms = elapsed_ms(start), count = backups.len());
    Ok(backups)
}
