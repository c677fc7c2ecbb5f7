use crate::error::{ImportError, Result};
use foodorder_core::domain::{BatchId, LatestBatch, RawOrder, StoredBatch};
use foodorder_core::dto::{AddBatchRequest, AddBatchResponse, ApiErrorDto};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("foodorder/", env!("CARGO_PKG_VERSION"));
const API_PREFIX: &str = "api/survey-data/";

/// Blocking client for a remote order gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base: Url,
    client: Client,
}

impl GatewayClient {
    pub fn new(base: &Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|err| ImportError::Unavailable(err.to_string()))?;
        Ok(Self {
            base: normalize_base(base),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn add_batch(&self, orders: &[RawOrder], username: Option<&str>) -> Result<BatchId> {
        let url = self.endpoint("add")?;
        let body = AddBatchRequest {
            survey_data: orders.to_vec(),
            username: username.map(str::to_string),
        };
        debug!(%url, rows = orders.len(), "posting batch");
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .map_err(transport_error)?;
        let created: AddBatchResponse = read_json(response)?;
        Ok(created.id)
    }

    pub fn list_batches(&self) -> Result<Vec<StoredBatch>> {
        let response = self.get("all")?;
        read_json(response)
    }

    pub fn latest_batch(&self) -> Result<Option<LatestBatch>> {
        let response = self.get("latest")?;
        read_optional_json(response)
    }

    pub fn get_batch(&self, id: BatchId) -> Result<Option<StoredBatch>> {
        let response = self.get(&id.to_string())?;
        read_optional_json(response)
    }

    fn get(&self, path: &str) -> Result<Response> {
        let url = self.endpoint(path)?;
        debug!(%url, "fetching");
        self.client.get(url).send().map_err(transport_error)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(API_PREFIX)?.join(path)?)
    }
}

fn normalize_base(base: &Url) -> Url {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);
    base
}

fn transport_error(err: reqwest::Error) -> ImportError {
    ImportError::Unavailable(err.to_string())
}

fn read_optional_json<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    read_json(response).map(Some)
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().map_err(transport_error)?;

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|err| ImportError::Response(err.to_string()));
    }

    let api_error = serde_json::from_str::<ApiErrorDto>(&body).ok();
    match (status, api_error) {
        (StatusCode::BAD_REQUEST, Some(api_error)) => Err(ImportError::Rejected(api_error)),
        (_, Some(api_error)) => Err(ImportError::Gateway {
            status: status.as_u16(),
            message: api_error.error,
        }),
        (_, None) => Err(ImportError::Gateway {
            status: status.as_u16(),
            message: body,
        }),
    }
}
