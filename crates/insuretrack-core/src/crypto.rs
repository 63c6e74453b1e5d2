//! Password hashing
//!
//! Passwords are stored only as Argon2id PHC strings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use insuretrack_core_types::Sensitive;

use crate::errors::{ExError, ExErrorKind};

/// Hash a plain-text password with a fresh random salt
///
/// # Errors
/// `ExErrorKind::Internal` if the hasher rejects its parameters.
pub fn hash_password(password: &Sensitive<String>) -> std::result::Result<Sensitive<String>, ExError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map(|hash| Sensitive::new(hash.to_string()))
        .map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op("hash_password")
                .with_message(e.to_string())
        })
}

/// Check a plain-text password against a stored hash
///
/// An unparseable stored hash never verifies.
pub fn verify_password(password: &Sensitive<String>, stored_hash: &Sensitive<String>) -> bool {
    match PasswordHash::new(stored_hash.expose()) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.expose().as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
