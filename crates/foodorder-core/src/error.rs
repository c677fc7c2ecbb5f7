use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid batch id: {0}")]
    InvalidBatchId(String),
    #[error("invalid restaurant tag: {0}")]
    InvalidRestaurantTag(String),
    #[error("invalid stale_after_days: {0}")]
    InvalidStaleDays(i64),
    #[error("invalid max_bcc_chars: {0}")]
    InvalidMaxBccChars(usize),
}
