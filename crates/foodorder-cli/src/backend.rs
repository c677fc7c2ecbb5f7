use anyhow::Result;
use foodorder_core::domain::{BatchId, LatestBatch, RawOrder, StoredBatch};
use foodorder_core::rules::validate_orders;
use foodorder_core::time::now_utc;
use foodorder_store::Store;
use std::time::Duration;

/// Where batches are saved and read back.
pub trait Backend {
    fn describe(&self) -> String;
    fn add_batch(&self, orders: &[RawOrder], username: Option<&str>) -> Result<BatchId>;
    fn list_batches(&self) -> Result<Vec<StoredBatch>>;
    fn latest_batch(&self) -> Result<Option<LatestBatch>>;
    fn get_batch(&self, id: BatchId) -> Result<Option<StoredBatch>>;
}

pub struct LocalBackend {
    store: Store,
}

impl LocalBackend {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Backend for LocalBackend {
    fn describe(&self) -> String {
        "local database".to_string()
    }

    fn add_batch(&self, orders: &[RawOrder], username: Option<&str>) -> Result<BatchId> {
        validate_orders(orders)?;
        Ok(self.store.batches().add(now_utc(), orders, username)?)
    }

    fn list_batches(&self) -> Result<Vec<StoredBatch>> {
        Ok(self.store.batches().list()?)
    }

    fn latest_batch(&self) -> Result<Option<LatestBatch>> {
        Ok(self.store.batches().latest()?)
    }

    fn get_batch(&self, id: BatchId) -> Result<Option<StoredBatch>> {
        Ok(self.store.batches().get(id)?)
    }
}

#[cfg(feature = "remote")]
mod remote_backend {
    use super::Backend;
    use anyhow::Result;
    use foodorder_core::domain::{BatchId, LatestBatch, RawOrder, StoredBatch};
    use foodorder_import::GatewayClient;

    pub struct RemoteBackend {
        pub(super) client: GatewayClient,
    }

    impl Backend for RemoteBackend {
        fn describe(&self) -> String {
            format!("gateway {}", self.client.base_url())
        }

        fn add_batch(&self, orders: &[RawOrder], username: Option<&str>) -> Result<BatchId> {
            Ok(self.client.add_batch(orders, username)?)
        }

        fn list_batches(&self) -> Result<Vec<StoredBatch>> {
            Ok(self.client.list_batches()?)
        }

        fn latest_batch(&self) -> Result<Option<LatestBatch>> {
            Ok(self.client.latest_batch()?)
        }

        fn get_batch(&self, id: BatchId) -> Result<Option<StoredBatch>> {
            Ok(self.client.get_batch(id)?)
        }
    }
}

#[cfg(feature = "remote")]
pub fn remote(base: &foodorder_config::Url, timeout: Duration) -> Result<Box<dyn Backend>> {
    let client = foodorder_import::GatewayClient::new(base, timeout)?;
    Ok(Box::new(remote_backend::RemoteBackend { client }))
}

#[cfg(not(feature = "remote"))]
pub fn remote(base: &foodorder_config::Url, _timeout: Duration) -> Result<Box<dyn Backend>> {
    Err(crate::error::invalid_input(format!(
        "cannot reach {base}: built without the remote feature"
    )))
}
