use std::fs;
use std::path::Path;

use extractor_engine::{guess_content_type, load_document, DocumentError};
use tempfile::TempDir;

#[test]
fn pdf_extension_is_declared_as_pdf() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("label.pdf");
    fs::write(&path, b"%PDF-1.7\n").unwrap();

    let doc = load_document(&path, None).unwrap();
    assert_eq!(doc.file_name, "label.pdf");
    assert_eq!(doc.content_type, "application/pdf");
    assert_eq!(doc.bytes, b"%PDF-1.7\n");
}

#[test]
fn explicit_content_type_wins_over_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("scan.bin");
    fs::write(&path, b"%PDF").unwrap();

    let doc = load_document(&path, Some(" application/pdf ")).unwrap();
    assert_eq!(doc.content_type, "application/pdf");

    let doc = load_document(&path, Some("  ")).unwrap();
    assert_eq!(doc.content_type, "application/octet-stream");
}

#[test]
fn image_extension_is_not_pdf() {
    assert_eq!(guess_content_type(Path::new("photo.png")), "image/png");
    assert_eq!(
        guess_content_type(Path::new("no_extension")),
        "application/octet-stream"
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.pdf");

    let err = load_document(&path, None).unwrap_err();
    assert!(matches!(err, DocumentError::Io { .. }));
    assert!(err.to_string().contains("absent.pdf"));
}
