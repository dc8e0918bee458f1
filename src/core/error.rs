use thiserror::Error;

/// Errors that can occur while configuring or generating invoices.
///
/// Failing to reach the tolerance band is *not* an error; see
/// [`FillStatus::ToleranceNotMet`](super::FillStatus::ToleranceNotMet).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BillError {
    /// Invalid static input: non-positive totals, zero counts, empty catalog,
    /// or out-of-range tuning parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Catalog or customer text could not be parsed.
    #[error("catalog line {line}: {message}")]
    Catalog { line: usize, message: String },

    /// Bill number sequencing error.
    #[error("numbering error: {0}")]
    Numbering(String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "items[2].quantity").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Join validation errors into a single [`BillError::Validation`].
pub(crate) fn into_validation_error(errors: &[ValidationError]) -> BillError {
    let msg = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    BillError::Validation(msg)
}
