//! Remote store backend
//!
//! Talks to the external key-value service over its REST surface:
//! `GET {base_url}/{key}` returns the raw value (404 when absent),
//! `PUT {base_url}/{key}` replaces it. Authentication is an optional
//! bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{SnapshotStore, StoreError};
use crate::config::StorageConfig;

pub struct RemoteKvStore {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl RemoteKvStore {
    pub fn new(cfg: &StorageConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            auth_token: cfg.auth_token.clone(),
        })
    }

    fn key_url(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl SnapshotStore for RemoteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let response = self
            .authorize(self.client.get(self.key_url(key)))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(Some(response.text().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(StoreError::UnexpectedStatus(status.as_u16())),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let response = self
            .authorize(self.client.put(self.key_url(key)))
            .body(value.to_string())
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StoreError::UnexpectedStatus(response.status().as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_config(base_url: &str) -> StorageConfig {
        StorageConfig {
            backend: crate::config::StorageBackend::Remote,
            base_url: base_url.to_string(),
            auth_token: None,
            timeout: 30,
        }
    }

    #[test]
    fn test_key_url_strips_trailing_slash() {
        let store = RemoteKvStore::new(&storage_config("http://kv.local/v1/")).unwrap();
        assert_eq!(store.key_url("snapshot"), "http://kv.local/v1/snapshot");
    }

    #[test]
    fn test_key_url_without_trailing_slash() {
        let store = RemoteKvStore::new(&storage_config("http://kv.local/v1")).unwrap();
        assert_eq!(
            store.key_url("snapshot_timestamp"),
            "http://kv.local/v1/snapshot_timestamp"
        );
    }
}
