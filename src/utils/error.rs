use serde::Serialize;
use thiserror::Error;

/// A single rejected input field, reported back to the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Spreadsheet,
    Rendering,
    Storage,
    Configuration,
    Internal,
}

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Spreadsheet could not be read: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Document XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field '{field}'")]
    MissingConfigError { field: String },

    #[error("{} invalid field(s): {}", violations.len(), join_violations(violations))]
    ValidationError { violations: Vec<FieldViolation> },

    #[error("Spreadsheet has no worksheet")]
    EmptyWorkbook,

    #[error("Spreadsheet is missing required column(s): {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Row {row} has product data but no factory name")]
    MissingFactory { row: usize },

    #[error("Spreadsheet contains no product rows")]
    NoProductRows,

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Malformed multipart request: {message}")]
    MultipartError { message: String },

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl LabelError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ValidationError { .. }
            | Self::MultipartError { .. } => ErrorCategory::Input,
            Self::SpreadsheetError(_)
            | Self::EmptyWorkbook
            | Self::MissingColumns { .. }
            | Self::MissingFactory { .. }
            | Self::NoProductRows => ErrorCategory::Spreadsheet,
            Self::XmlError(_) | Self::ZipError(_) => ErrorCategory::Rendering,
            Self::IoError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::TaskError(_) | Self::ProcessingError { .. } => ErrorCategory::Internal,
        }
    }

    /// Converts a single-field error into the violation reported to the submitter.
    pub fn into_violation(self) -> FieldViolation {
        match self {
            Self::InvalidConfigValueError { field, reason, .. } => FieldViolation::new(field, reason),
            Self::MissingConfigError { field } => FieldViolation::new(field, "field is required"),
            other => FieldViolation::new("request", other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, LabelError>;
