//! Tests for conversions into the top-level error type.

use novel_diver_error::{
    GenerationError, GenerationErrorKind, NovelDiverError, NovelDiverErrorKind, SessionError,
    SessionErrorKind, ValidationError,
};

#[test]
fn test_generation_error_converts_and_is_recoverable() {
    let err: NovelDiverError = GenerationError::from_message("429 Too Many Requests").into();

    let generation = err.as_generation().expect("generation error");
    assert!(matches!(generation.kind, GenerationErrorKind::Quota(_)));
    assert!(generation.is_retryable());
}

#[test]
fn test_session_error_is_not_a_generation_error() {
    let err: NovelDiverError =
        SessionError::new(SessionErrorKind::InvalidChoice { index: 7, available: 4 }).into();

    assert!(err.as_generation().is_none());
    assert!(matches!(err.kind(), NovelDiverErrorKind::Session(_)));
    assert!(format!("{}", err).contains("Invalid choice 7"));
}

#[test]
fn test_validation_error_lists_every_issue() {
    let err = ValidationError::new(vec![
        "Name must be at least 2 characters long".to_string(),
        "World must be specified".to_string(),
    ]);

    let rendered = err.to_string();
    assert!(rendered.contains("Name must be at least 2 characters long"));
    assert!(rendered.contains("World must be specified"));
}

#[test]
fn test_error_records_creation_site() {
    let err = GenerationError::new(GenerationErrorKind::Unavailable);
    assert!(err.file.ends_with("error_conversion_test.rs"));
    assert!(err.line > 0);
}
