//! Application state shared across handlers.

use std::sync::Arc;

use strata_core::{DatasetStore, LoadedDataset};

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DatasetStore>,
}

impl AppState {
    pub fn new(store: DatasetStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// The loaded timeline, loading it on a blocking thread if startup did
    /// not already.
    pub async fn dataset(&self) -> Result<Arc<LoadedDataset>, ApiError> {
        if let Some(dataset) = self.store.get() {
            return Ok(dataset);
        }

        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.ensure_loaded())
            .await
            .map_err(|e| ApiError::Internal(format!("dataset load task failed: {}", e)))?
            .map_err(ApiError::from)
    }

    /// Fingerprint of the loaded dataset, without triggering a load.
    pub fn fingerprint(&self) -> Option<String> {
        self.store.get().map(|d| d.fingerprint.clone())
    }
}
