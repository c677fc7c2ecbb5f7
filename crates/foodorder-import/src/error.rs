use foodorder_core::dto::ApiErrorDto;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV at line {line}: {message}")]
    Csv { line: u64, message: String },
    #[error("CSV file has no header row")]
    MissingHeader,
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
    #[error("gateway rejected the batch: {}", .0.error)]
    Rejected(ApiErrorDto),
    #[error("gateway error {status}: {message}")]
    Gateway { status: u16, message: String },
    #[error("invalid gateway response: {0}")]
    Response(String),
    #[cfg(feature = "remote")]
    #[error("invalid gateway url: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ImportError>;

impl ImportError {
    /// Errors caused by the uploaded content rather than the environment.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ImportError::Csv { .. } | ImportError::MissingHeader | ImportError::Rejected(_)
        )
    }
}
