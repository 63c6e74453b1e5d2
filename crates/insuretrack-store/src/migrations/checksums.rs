//! SHA-256 of migration SQL, hex encoded

use sha2::{Digest, Sha256};

pub fn compute_checksum(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_hex_sha256() {
        let checksum = compute_checksum("CREATE TABLE t (x);");
        assert_eq!(checksum.len(), 64);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_whitespace_changes_checksum() {
        assert_ne!(
            compute_checksum("CREATE TABLE t (x);"),
            compute_checksum("CREATE TABLE t (x); ")
        );
    }
}
