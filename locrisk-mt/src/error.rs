/// Error types for translation providers and exports
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Backend missing credentials or configuration
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
    /// Endpoint unreachable or transport failure
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Non-success HTTP status from a backend
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// Response could not be decoded into an ordered list of translations
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// Backend reported a translation failure
    #[error("Translation error: {0}")]
    TranslationError(String),
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    /// Backend name not known at all
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::NetworkError(err.to_string())
        }
    }
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failure of a single export action; the processed results are unaffected
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error(transparent)]
    Report(#[from] locrisk::ReportError),
    #[error("Nothing to export")]
    Empty,
}
