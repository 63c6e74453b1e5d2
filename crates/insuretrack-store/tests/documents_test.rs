mod common;

use common::at;
use insuretrack_core::errors::ExErrorKind;
use insuretrack_store::DocumentStore;
use tempfile::TempDir;

const LIMIT: u64 = 1024;

fn store(dir: &TempDir) -> DocumentStore {
    DocumentStore::new(dir.path().join("uploads"), LIMIT)
}

#[test]
fn test_save_prefixes_timestamp_and_sanitizes() {
    let dir = TempDir::new().unwrap();
    let documents = store(&dir);

    let stored = documents
        .save("Police Report (final).PDF", b"%PDF-1.4", at(2025, 3, 4, 5, 6, 7))
        .unwrap();

    assert_eq!(stored, "20250304_050607_Police_Report_final.PDF");
    let path = documents.path_for(&stored).unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.4");
}

#[test]
fn test_save_rejects_disallowed_extension() {
    let dir = TempDir::new().unwrap();
    let err = store(&dir)
        .save("payload.exe", b"MZ", at(2025, 3, 4, 5, 6, 7))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.field(), Some("documents"));
    assert!(!dir.path().join("uploads").exists());
}

#[test]
fn test_save_rejects_oversized_file() {
    let dir = TempDir::new().unwrap();
    let payload = vec![0u8; LIMIT as usize + 1];
    let err = store(&dir)
        .save("scan.png", &payload, at(2025, 3, 4, 5, 6, 7))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}

#[test]
fn test_save_accepts_file_at_limit() {
    let dir = TempDir::new().unwrap();
    let payload = vec![0u8; LIMIT as usize];
    assert!(store(&dir)
        .save("scan.png", &payload, at(2025, 3, 4, 5, 6, 7))
        .is_ok());
}

#[test]
fn test_path_for_refuses_traversal() {
    let dir = TempDir::new().unwrap();
    let documents = store(&dir);

    for name in ["../secret.pdf", "/etc/passwd", "", "a/b.pdf"] {
        let err = documents.path_for(name).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput, "{name:?}");
    }
}

#[test]
fn test_path_for_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = store(&dir).path_for("20250101_000000_gone.pdf").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}
