// Snapshot store module entry
// The only interface to the external key-value store

mod memory;
mod remote;

pub use memory::MemoryStore;
pub use remote::RemoteKvStore;

use async_trait::async_trait;
use thiserror::Error;

/// Key holding the serialized price snapshot (JSON array)
pub const SNAPSHOT_KEY: &str = "snapshot";

/// Key holding the ISO-8601 instant of the last accepted update
pub const TIMESTAMP_KEY: &str = "snapshot_timestamp";

/// Failure talking to the key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store returned unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("stored value corrupt: {0}")]
    Corrupt(String),
}

/// Read/write access to the external key-value store.
///
/// Only two logical keys are ever used (`snapshot` and
/// `snapshot_timestamp`). The store offers no multi-key transaction, so
/// callers writing both keys must accept the inconsistency window between
/// the two puts.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Fetch a value; `None` means the key has never been written (or expired).
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, overwriting any previous one.
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
