//! Redacting wrapper for credentials
//!
//! Plain-text passwords travel from the CLI into the account commands, and
//! password hashes travel between the store and the backup engine. Both are
//! wrapped in `Sensitive<T>` so a stray `{:?}` on a command input or a user
//! record never leaks them into the logs.

use std::fmt;

use serde::{Deserialize, Serialize};

const REDACTED: &str = "***REDACTED***";

/// Wrapper for secret material that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use insuretrack_core_types::Sensitive;
///
/// let password = Sensitive::new("hunter22".to_string());
/// assert_eq!(format!("{:?}", password), "***REDACTED***");
/// assert_eq!(password.expose(), "hunter22");
/// ```
///
/// Serialization is transparent: a `Sensitive<String>` is written as the bare
/// string, so the backup format carries the value itself.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the secret. Call sites should be limited to hashing,
    /// verification and persistence.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl From<String> for Sensitive<String> {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Sensitive<String> {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
