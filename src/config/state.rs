// Application state module
// Everything handlers need, built once at startup and shared via Arc

use std::sync::Arc;

use super::types::{Config, StorageBackend};
use crate::auth::Authenticator;
use crate::store::{MemoryStore, RemoteKvStore, SnapshotStore, StoreError};

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn SnapshotStore>,
    pub authenticator: Authenticator,
}

impl AppState {
    /// Create `AppState` with the store backend selected by configuration
    pub fn new(config: Config) -> Result<Self, StoreError> {
        let store: Arc<dyn SnapshotStore> = match config.storage.backend {
            StorageBackend::Remote => Arc::new(RemoteKvStore::new(&config.storage)?),
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };

        Ok(Self::with_store(config, store))
    }

    /// Create `AppState` around an explicit store (used by tests)
    pub fn with_store(config: Config, store: Arc<dyn SnapshotStore>) -> Self {
        let authenticator = Authenticator::new(config.update.api_key.clone());
        Self {
            config,
            store,
            authenticator,
        }
    }
}
