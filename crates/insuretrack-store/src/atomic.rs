//! Temp-file + rename writes, so readers never see a partial file

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{io_error, Result};

/// Write `content` to `target_path` atomically, creating parent directories
///
/// # Errors
/// I/O failures; the temp file is removed if the rename fails.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_dir", e))?;
    }

    let temp_path = temp_path_for(target_path);
    fs::write(&temp_path, content).map_err(|e| io_error("write_temp", e))?;

    if let Err(e) = fs::rename(&temp_path, target_path) {
        fs::remove_file(&temp_path).ok();
        return Err(io_error("rename_temp", e));
    }

    Ok(())
}

/// Sibling of the target, hidden and suffixed so directory scans skip it
fn temp_path_for(target_path: &Path) -> PathBuf {
    let name = target_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target_path.with_file_name(format!(".{}.tmp", name))
}
