//! Subcommand implementations and the context they share

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use insuretrack_core::logging_facility;
use insuretrack_core::AppConfig;
use insuretrack_engine::Services;
use rusqlite::Connection;

pub mod backup;
pub mod dashboard;
pub mod init;
pub mod users;

pub type CliResult = Result<(), Box<dyn Error>>;

/// Flags accepted by every subcommand; they override configuration
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Configuration file (defaults to an optional insuretrack.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[arg(long, global = true)]
    pub backup_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    pub upload_dir: Option<PathBuf>,
}

/// Open database plus services, built once per invocation
pub struct Context {
    pub conn: Connection,
    pub services: Services,
}

impl Context {
    pub fn open(global: &GlobalArgs) -> Result<Self, Box<dyn Error>> {
        let mut config = AppConfig::load_from(global.config.as_deref())?;
        if let Some(db) = &global.db {
            config.database_path = db.clone();
        }
        if let Some(dir) = &global.backup_dir {
            config.backup_dir = dir.clone();
        }
        if let Some(dir) = &global.upload_dir {
            config.upload_dir = dir.clone();
        }

        logging_facility::init(config.log_profile);

        let conn = insuretrack_store::db::open(&config.database_path)?;
        Ok(Self {
            conn,
            services: Services::new(config),
        })
    }
}
