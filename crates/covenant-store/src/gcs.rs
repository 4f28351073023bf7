//! GCS object listing client
//!
//! Read-only client for the GCS JSON API. The pipeline only ever lists
//! object names under a prefix; documents themselves are fetched by the
//! extraction service via their `gs://` URI.

use crate::StoreError;
use async_trait::async_trait;
use covenant_domain::traits::{ObjectEntry, ObjectStore};
use serde::Deserialize;
use std::time::Duration;

/// Default GCS JSON API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com/storage/v1";

/// Default timeout for listing requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// GCS bucket listing client
pub struct GcsClient {
    endpoint: String,
    bucket: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    items: Vec<GcsObject>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct GcsObject {
    name: String,
    // GCS serializes sizes as decimal strings
    #[serde(default)]
    size: Option<String>,
}

impl GcsClient {
    /// Create a new listing client for a bucket
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_token: None,
            client,
        }
    }

    /// Create a client against the public GCS endpoint
    pub fn for_bucket(bucket: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, bucket)
    }

    /// Set the bearer token sent with each request
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// The `gs://` URI for an object in this bucket
    fn object_uri(&self, name: &str) -> String {
        format!("gs://{}/{}", self.bucket, name)
    }

    async fn list_page(
        &self,
        prefix: &str,
        page_token: Option<&str>,
    ) -> Result<ListResponse, StoreError> {
        let url = format!("{}/b/{}/o", self.endpoint, self.bucket);

        let mut request = self.client.get(&url).query(&[
            ("prefix", prefix),
            ("fields", "items(name,size),nextPageToken"),
        ]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(StoreError::Auth(format!(
                "Bucket {} listing denied ({})",
                self.bucket, status
            )));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StoreError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<ListResponse>()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse listing: {}", e)))
    }
}

#[async_trait]
impl ObjectStore for GcsClient {
    type Error = StoreError;

    /// List every object under `prefix`, following pagination
    ///
    /// Entry names are full `gs://bucket/name` URIs, the reference the
    /// extraction service uses to fetch the document.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectEntry>, Self::Error> {
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_page(prefix, page_token.as_deref()).await?;

            for object in page.items {
                let size = object
                    .size
                    .as_deref()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(0);
                entries.push(ObjectEntry {
                    name: self.object_uri(&object.name),
                    size,
                });
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GcsClient::for_bucket("contracts");
        assert_eq!(client.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(client.bucket, "contracts");
        assert!(client.access_token.is_none());
    }

    #[test]
    fn test_object_uri() {
        let client = GcsClient::for_bucket("contracts");
        assert_eq!(
            client.object_uri("2020/a.pdf"),
            "gs://contracts/2020/a.pdf"
        );
    }

    #[test]
    fn test_with_access_token() {
        let client = GcsClient::for_bucket("contracts").with_access_token("tok");
        assert_eq!(client.access_token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_listing_unreachable_endpoint() {
        let client = GcsClient::new("http://127.0.0.1:1", "contracts");
        let result = client.list_objects("2020/").await;
        assert!(matches!(result, Err(StoreError::Communication(_))));
    }
}
