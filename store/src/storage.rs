//! Object-storage client.
//!
//! Uploads land under opaque generated names; the returned public URL is
//! what gets written into the metadata row. Deletes are best-effort from the
//! caller's point of view: the durable row is the source of truth and a
//! leftover blob is an accepted cost.

use reqwest::Client;

use crate::error::{remote_message, StoreError};

#[derive(Clone)]
pub struct StorageClient {
    http: Client,
    base: String,
    key: String,
}

impl StorageClient {
    pub fn new(base: &str, key: &str) -> Self {
        Self {
            http: Client::new(),
            base: base.trim_end_matches('/').to_string(),
            key: key.to_string(),
        }
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base, bucket, path)
    }

    /// Stable URL the public boards fetch the blob from.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base, bucket, path)
    }

    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.object_url(bucket, path))
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("content-type", content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Remote(remote_message(status, &body)))
    }

    pub async fn remove(&self, bucket: &str, path: &str) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(self.object_url(bucket, path))
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Remote(remote_message(status, &body)))
    }
}

/// Last path segment of a public URL, i.e. the object name inside its
/// bucket. Used to clean up the previous blob after a replace or delete.
pub fn object_name(public_url: &str) -> Option<&str> {
    public_url
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
