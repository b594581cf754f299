use thiserror::Error;

pub type ExportResult<T> = Result<T, ExportError>;

/// Failure taxonomy for a run. A malformed backend name is deliberately
/// not represented here: the parser degrades to the raw text and the run
/// continues.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}
