// models/src/errors.rs

use serde::Serialize;
pub use thiserror::Error;

/// One offending field in a rejected submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Schema field name, e.g. `age` or `bsi_source`.
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        FieldError {
            field,
            message: message.into(),
        }
    }
}

/// A validation error. Carries every offending field of the submission,
/// not just the first one encountered.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid record, offending fields: {}", offending_fields(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(fields: Vec<FieldError>) -> Self {
        ValidationError { fields }
    }

    /// Names of the offending fields, in Schema order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.field).collect()
    }
}

fn offending_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.field)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;
