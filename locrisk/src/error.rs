use thiserror::Error;

/// Caller-level validation errors raised before any work starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no target language selected")]
    NoTargetLanguage,
    #[error("invalid language code: {0}")]
    InvalidLanguage(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV report is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("failed to finish CSV report: {0}")]
    Io(#[from] std::io::Error),
}
