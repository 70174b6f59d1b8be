use thiserror::Error;

/// Failures of the ingest → compose → dispatch pipeline.
///
/// Column-role detection never fails; a role that does not resolve is simply
/// absent from [`crate::pipeline::roles::ColumnRoles`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Unsupported file format: {0} (expected .csv, .xlsx, .xlsm, .xlsb, .xls or .ods)")]
    UnsupportedFormat(String),

    #[error("Failed to parse {format} data: {message}")]
    ParseError { format: String, message: String },

    #[error("Unknown analysis focus: {0}")]
    UnknownFocus(String),

    #[error("Failed to render data sample: {0}")]
    Render(String),

    #[error("No table loaded; load a file before running an analysis")]
    NoTable,

    #[error("Text generation service error: {0}")]
    ExternalService(String),
}

impl AnalysisError {
    pub(crate) fn parse(format: &str, message: impl Into<String>) -> Self {
        AnalysisError::ParseError {
            format: format.to_string(),
            message: message.into(),
        }
    }
}
