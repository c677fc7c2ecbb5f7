use crate::domain::ids::BatchId;
use crate::domain::order::RawOrder;
use serde::{Deserialize, Serialize};

/// A saved upload. `title` and `archived` exist in the table but nothing sets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBatch {
    pub id: BatchId,
    pub title: Option<String>,
    pub survey_data: Vec<RawOrder>,
    pub created_at: i64,
    pub archived: bool,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestBatch {
    pub survey_data: Vec<RawOrder>,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl From<StoredBatch> for LatestBatch {
    fn from(batch: StoredBatch) -> Self {
        Self {
            survey_data: batch.survey_data,
            created_at: batch.created_at,
            username: batch.username,
        }
    }
}
