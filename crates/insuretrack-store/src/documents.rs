//! Uploaded claim documents
//!
//! Files are stored flat in one upload directory as
//! `<YYYYMMDD_HHMMSS>_<sanitized name>`; a claim keeps the stored names in
//! its `documents` column. Files are never deleted.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use insuretrack_core::errors::{ExError, ExErrorKind};

use crate::atomic::atomic_write;
use crate::errors::Result;

pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "doc", "docx"];

const STORED_NAME_PREFIX_FORMAT: &str = "%Y%m%d_%H%M%S_";

#[derive(Debug, Clone)]
pub struct DocumentStore {
    upload_dir: PathBuf,
    max_bytes: u64,
}

impl DocumentStore {
    pub fn new(upload_dir: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            max_bytes,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Store an upload and return the name it was stored under
    ///
    /// # Errors
    /// `InvalidInput` for a name that sanitizes to nothing, a disallowed
    /// extension or an oversized payload; `Io` if the write fails.
    pub fn save(&self, original_name: &str, bytes: &[u8], now: NaiveDateTime) -> Result<String> {
        let sanitized = secure_filename(original_name);
        if sanitized.is_empty() {
            return Err(rejected(format!(
                "file name '{}' has no usable characters",
                original_name
            )));
        }
        if !has_allowed_extension(&sanitized) {
            return Err(rejected(format!(
                "'{}' is not an allowed document type ({})",
                sanitized,
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        if bytes.len() as u64 > self.max_bytes {
            return Err(rejected(format!(
                "'{}' is {} bytes, above the {} byte limit",
                sanitized,
                bytes.len(),
                self.max_bytes
            )));
        }

        let stored = format!("{}{}", now.format(STORED_NAME_PREFIX_FORMAT), sanitized);
        atomic_write(&self.upload_dir.join(&stored), bytes)?;

        tracing::debug!(stored_name = %stored, size = bytes.len(), "Stored claim document");
        Ok(stored)
    }

    /// Resolve a stored name to its path
    ///
    /// # Errors
    /// `InvalidInput` for anything that is not a plain stored file name;
    /// `NotFound` if no such file exists.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || secure_filename(name) != name {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("document_path")
                .with_field("filename")
                .with_message(format!("'{}' is not a stored document name", name)));
        }

        let path = self.upload_dir.join(name);
        if !path.is_file() {
            return Err(ExError::new(ExErrorKind::NotFound)
                .with_op("document_path")
                .with_entity_id(name)
                .with_message(format!("document '{}' not found", name)));
        }
        Ok(path)
    }
}

fn rejected(message: String) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("save_document")
        .with_field("documents")
        .with_message(message)
}

fn has_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        ALLOWED_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed))
    })
}

/// Reduce an uploaded file name to a safe, flat one
///
/// Non-ASCII characters are dropped, path separators become spaces,
/// whitespace runs become `_`, anything outside `[A-Za-z0-9._-]` is removed,
/// and leading or trailing `.`/`_` are stripped. May return an empty string.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_secure_filename_examples() {
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("i contain cool \u{fc}ml\u{e4}uts.txt"), "i_contain_cool_mluts.txt");
        assert_eq!(secure_filename("..\\windows\\system.ini"), "windows_system.ini");
        assert_eq!(secure_filename("___"), "");
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        assert!(has_allowed_extension("scan.PDF"));
        assert!(has_allowed_extension("photo.jpeg"));
        assert!(!has_allowed_extension("script.sh"));
        assert!(!has_allowed_extension("pdf"));
    }

    proptest! {
        #[test]
        fn prop_sanitized_names_are_flat(name in any::<String>()) {
            let safe = secure_filename(&name);
            prop_assert!(safe
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
            prop_assert!(!safe.starts_with('.') && !safe.starts_with('_'));
            prop_assert!(!safe.ends_with('.') && !safe.ends_with('_'));
        }

        #[test]
        fn prop_sanitizing_is_idempotent(name in any::<String>()) {
            let once = secure_filename(&name);
            prop_assert_eq!(secure_filename(&once), once);
        }
    }
}
