use crate::error::ApiError;
use foodorder_core::time::now_utc;
use foodorder_store::Store;
use std::sync::{Arc, Mutex};

/// Shared handler state. The connection is used from blocking tasks, one at a time.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Store>>,
    clock: fn() -> i64,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            clock: now_utc,
        }
    }

    /// Replaces the wall clock, for deterministic `created_at` values.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> i64 {
        (self.clock)()
    }

    pub async fn with_store<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Store) -> foodorder_store::error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let guard = store
                .lock()
                .map_err(|_| ApiError::Internal("store lock poisoned".to_string()))?;
            f(&guard).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
    }
}
