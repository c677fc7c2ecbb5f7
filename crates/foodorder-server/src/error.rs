use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use foodorder_core::dto::ApiErrorDto;
use foodorder_core::rules::ValidationError;
use foodorder_store::error::StoreError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("invalid batch id: {0}")]
    InvalidId(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedPayload(_) | ApiError::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(err) => ApiErrorDto::from(err),
            ApiError::Store(_) | ApiError::Internal(_) => {
                error!(error = %self, "request failed");
                ApiErrorDto::new("internal server error")
            }
            other => ApiErrorDto::new(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
