//! `insuretrack backup`

use std::path::PathBuf;

use clap::{Args, Subcommand};
use insuretrack_engine::commands::accounts::resolve_actor;
use insuretrack_engine::commands::backup::{create_backup, list_backups, restore_backup};

use super::{CliResult, Context};

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub command: BackupCommand,
}

#[derive(Debug, Subcommand)]
pub enum BackupCommand {
    /// Export every table to a timestamped JSON file
    Create {
        /// Admin account to act as
        #[arg(long = "as", default_value = "admin")]
        actor: String,
    },
    /// Replace all data with a snapshot
    Restore {
        /// Snapshot to load (defaults to latest_backup.json)
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long = "as", default_value = "admin")]
        actor: String,
    },
    /// List history snapshots, newest first
    List {
        #[arg(long = "as", default_value = "admin")]
        actor: String,
    },
}

pub fn execute(args: BackupArgs, ctx: &mut Context) -> CliResult {
    match args.command {
        BackupCommand::Create { actor } => {
            let actor = resolve_actor(&actor, &ctx.conn)?;
            let outcome = create_backup(&actor, &mut ctx.conn, &ctx.services)?;
            println!("Backup written: {}", outcome.path.display());
            println!(
                "  users: {}, policies: {}, claims: {}, notifications: {}",
                outcome.counts.users,
                outcome.counts.policies,
                outcome.counts.claims,
                outcome.counts.notifications
            );
        }
        BackupCommand::Restore { file, actor } => {
            let actor = resolve_actor(&actor, &ctx.conn)?;
            let outcome = restore_backup(&actor, file.as_deref(), &mut ctx.conn, &ctx.services)?;
            println!(
                "Restored {} (captured {})",
                outcome.source.display(),
                outcome.timestamp
            );
            println!(
                "  users: {}, policies: {}, claims: {}, notifications: {}",
                outcome.counts.users,
                outcome.counts.policies,
                outcome.counts.claims,
                outcome.counts.notifications
            );
        }
        BackupCommand::List { actor } => {
            let actor = resolve_actor(&actor, &ctx.conn)?;
            let backups = list_backups(&actor, &ctx.services)?;
            if backups.is_empty() {
                println!("No backups found");
            }
            for entry in backups {
                println!(
                    "{}  {}  {} bytes",
                    entry.captured_at.format("%Y-%m-%d %H:%M:%S"),
                    entry.filename,
                    entry.size_bytes
                );
            }
        }
    }
    Ok(())
}
