use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use foodorder_core::domain::{BatchId, LatestBatch, StoredBatch};
use foodorder_core::dto::{AddBatchRequest, AddBatchResponse};
use foodorder_core::rules::validate_orders;
use std::str::FromStr;
use tracing::{info, warn};

pub async fn add_batch(
    State(state): State<AppState>,
    payload: Result<Json<AddBatchRequest>, JsonRejection>,
) -> Result<Json<AddBatchResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected payload");
        ApiError::MalformedPayload(rejection.body_text())
    })?;

    if let Err(err) = validate_orders(&request.survey_data) {
        warn!(violations = err.violations.len(), "batch failed validation");
        return Err(err.into());
    }

    let now = state.now();
    let rows = request.survey_data.len();
    let id = state
        .with_store(move |store| {
            store
                .batches()
                .add(now, &request.survey_data, request.username.as_deref())
        })
        .await?;

    info!(%id, rows, "batch saved");
    Ok(Json(AddBatchResponse { id }))
}

pub async fn list_batches(State(state): State<AppState>) -> Result<Json<Vec<StoredBatch>>, ApiError> {
    let batches = state.with_store(|store| store.batches().list()).await?;
    Ok(Json(batches))
}

pub async fn latest_batch(State(state): State<AppState>) -> Result<Json<LatestBatch>, ApiError> {
    state
        .with_store(|store| store.batches().latest())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no batches stored yet".to_string()))
}

pub async fn get_batch(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<StoredBatch>, ApiError> {
    let id = BatchId::from_str(&raw_id).map_err(|_| ApiError::InvalidId(raw_id.clone()))?;
    state
        .with_store(move |store| store.batches().get(id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("batch {id}")))
}
