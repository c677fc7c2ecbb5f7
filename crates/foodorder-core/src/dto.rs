use crate::domain::{BatchId, RawOrder};
use crate::rules::{ValidationError, Violation};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/survey-data/add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddBatchRequest {
    #[serde(rename = "surveyData")]
    pub survey_data: Vec<RawOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddBatchResponse {
    pub id: BatchId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationDto {
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl From<&Violation> for ViolationDto {
    fn from(violation: &Violation) -> Self {
        Self {
            row: violation.row,
            field: violation.field.clone(),
            message: violation.message(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDto {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ViolationDto>,
}

impl ApiErrorDto {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }
}

impl From<&ValidationError> for ApiErrorDto {
    fn from(err: &ValidationError) -> Self {
        Self {
            error: err.to_string(),
            details: err.violations.iter().map(ViolationDto::from).collect(),
        }
    }
}
