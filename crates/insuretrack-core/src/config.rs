//! Application configuration
//!
//! Layered with the `config` crate, lowest precedence first:
//! 1. built-in defaults
//! 2. `insuretrack.toml` in the working directory (optional), or an explicit file
//! 3. `INSURETRACK_*` environment variables (e.g. `INSURETRACK_BACKUP_DIR`)
//!
//! Command-line flags are applied on top by the CLI.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{ExError, ExErrorKind};
use crate::logging_facility::Profile;

pub const DEFAULT_DATABASE_PATH: &str = "insurance_tracker.db";
pub const DEFAULT_BACKUP_DIR: &str = "backups";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

const ENV_PREFIX: &str = "INSURETRACK";
const CONFIG_FILE_STEM: &str = "insuretrack";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub backup_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: u64,
    /// Take a full backup after every successful mutation
    pub backup_on_write: bool,
    pub log_profile: Profile,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            backup_on_write: true,
            log_profile: Profile::Development,
        }
    }
}

impl AppConfig {
    /// Load defaults, the optional `insuretrack.toml`, then the environment
    ///
    /// # Errors
    /// `ExErrorKind::Configuration` when a source is malformed.
    pub fn load() -> std::result::Result<Self, ExError> {
        Self::load_from(None)
    }

    /// Like [`AppConfig::load`], but an explicit file replaces the optional
    /// default one and must exist.
    ///
    /// # Errors
    /// `ExErrorKind::Configuration` when a source is missing or malformed.
    pub fn load_from(file: Option<&Path>) -> std::result::Result<Self, ExError> {
        let defaults = Self::default();
        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(CONFIG_FILE_STEM).required(false),
        };

        config::Config::builder()
            .set_default("database_path", path_str(&defaults.database_path))
            .and_then(|b| b.set_default("backup_dir", path_str(&defaults.backup_dir)))
            .and_then(|b| b.set_default("upload_dir", path_str(&defaults.upload_dir)))
            .and_then(|b| b.set_default("max_upload_bytes", defaults.max_upload_bytes as i64))
            .and_then(|b| b.set_default("backup_on_write", defaults.backup_on_write))
            .and_then(|b| b.set_default("log_profile", "development"))
            .map_err(config_error)?
            .add_source(file_source)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize::<AppConfig>())
            .map_err(config_error)
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn config_error(err: config::ConfigError) -> ExError {
    ExError::new(ExErrorKind::Configuration)
        .with_op("load_config")
        .with_message(err.to_string())
}
