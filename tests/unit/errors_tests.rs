/*!
 * Tests for error types and conversions
 */

use hansub::errors::{AppError, EditError, ImportError};

#[test]
fn test_editError_entryNotFound_shouldDisplayId() {
    let error = EditError::EntryNotFound("sub_3".to_string());
    let display = format!("{}", error);
    assert!(display.contains("not found"));
    assert!(display.contains("sub_3"));
}

#[test]
fn test_editError_invalidSplitOffset_shouldDisplayOffsetAndLength() {
    let error = EditError::InvalidSplitOffset { id: "a".to_string(), offset: 12, len: 5 };
    let display = format!("{}", error);
    assert!(display.contains("12"));
    assert!(display.contains("text length 5"));
}

#[test]
fn test_importError_fromEditError_shouldWrapAsInvalid() {
    let import_error: ImportError = EditError::EmptyText("a".to_string()).into();
    let display = format!("{}", import_error);
    assert!(display.contains("Imported entries are invalid"));
    assert!(display.contains("cannot be empty"));
}

#[test]
fn test_appError_fromEditError_shouldWrapCorrectly() {
    let app_error: AppError = EditError::InsufficientEntries { given: 1 }.into();
    assert!(matches!(app_error, AppError::Edit(EditError::InsufficientEntries { given: 1 })));
    assert!(format!("{}", app_error).contains("Edit error"));
}

#[test]
fn test_appError_fromImportError_shouldWrapCorrectly() {
    let import_error = ImportError::InvalidTimestamp { block: 2, line: "00:00 --> bad".to_string() };
    let app_error: AppError = import_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Import error"));
    assert!(display.contains("block 2"));
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("File not found"));
}

#[test]
fn test_appError_fromAnyhowError_shouldWrapAsUnknown() {
    let app_error: AppError = anyhow::anyhow!("Something broke").into();
    assert!(matches!(app_error, AppError::Unknown(_)));
    assert!(format!("{}", app_error).contains("Something broke"));
}
