//! Error code and display tests.

use survey_core::errors::storage_error::SqliteCode;
use survey_core::errors::*;

#[test]
fn test_every_error_has_a_code() {
    let errors: Vec<(Box<dyn SurveyErrorCodeDisplay>, &str)> = vec![
        (Box::new(StorageError::DbBusy), "DB_BUSY"),
        (
            Box::new(StorageError::MigrationFailed {
                version: 1,
                message: "x".into(),
            }),
            "MIGRATION_FAILED",
        ),
        (
            Box::new(IngestError::DuplicateFileName { name: "a.xlsx".into() }),
            "DUPLICATE_FILE",
        ),
        (
            Box::new(IngestError::SheetRead {
                sheet: "OCI_R".into(),
                message: "bad".into(),
            }),
            "WORKBOOK_ERROR",
        ),
        (Box::new(IngestError::EmptyFileName), "INGEST_ERROR"),
        (Box::new(AnalysisError::UnknownFile { file_id: 9 }), "NOT_FOUND"),
        (
            Box::new(CompletionError::MissingApiKey {
                env_var: "OPENAI_API_KEY".into(),
            }),
            "MISSING_API_KEY",
        ),
        (Box::new(CompletionError::EmptyCompletion), "COMPLETION_ERROR"),
        (
            Box::new(ConfigError::FileNotFound { path: "x".into() }),
            "CONFIG_ERROR",
        ),
    ];
    for (err, code) in errors {
        assert_eq!(err.code(), code);
    }
}

/// Object-safe view over `SurveyErrorCode` for the table above.
trait SurveyErrorCodeDisplay {
    fn code(&self) -> &'static str;
}

impl<T: SurveyErrorCode> SurveyErrorCodeDisplay for T {
    fn code(&self) -> &'static str {
        self.error_code()
    }
}

#[test]
fn test_display_string_prefixes_code() {
    let err = IngestError::MissingColumn {
        sheet: "Respondent".into(),
        column: "department".into(),
    };
    assert_eq!(
        err.display_string(),
        "[INGEST_ERROR] Sheet Respondent is missing required column 'department'"
    );
}

#[test]
fn test_nested_storage_error_keeps_its_code() {
    let err: IngestError = StorageError::ConstraintViolation {
        message: "FOREIGN KEY constraint failed".into(),
    }
    .into();
    assert_eq!(err.error_code(), "CONSTRAINT_VIOLATION");

    let top: SurveyError = err.into();
    assert_eq!(top.error_code(), "CONSTRAINT_VIOLATION");
    assert!(top.to_string().starts_with("Ingest error:"));
}

#[test]
fn test_sqlite_code_classification() {
    assert!(matches!(
        StorageError::from_sqlite_message(Some(SqliteCode::Busy), "locked".into()),
        StorageError::DbBusy
    ));
    assert!(matches!(
        StorageError::from_sqlite_message(Some(SqliteCode::Constraint), "unique".into()),
        StorageError::ConstraintViolation { .. }
    ));
    assert!(matches!(
        StorageError::from_sqlite_message(None, "syntax".into()),
        StorageError::SqliteError { .. }
    ));
}
