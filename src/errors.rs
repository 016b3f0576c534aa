// errors.rs
use thiserror::Error;

/// Everything that can abort an export run.
///
/// Nothing is recovered locally: the first error stops pagination and the
/// workbook is never written.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid JSON response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Sheet(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Pagination loop detected: {0} was already fetched")]
    PaginationCycle(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;
