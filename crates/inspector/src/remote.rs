use async_trait::async_trait;
use inspector_common::{InspectorError, Result};
use inspector_exporter::{retry_with_backoff, BatchSource, RetryPolicy};
use inspector_index::{IndexDescriptor, VectorRecord};
use inspector_server::types::ListResponse;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client for a running inspector service
#[derive(Debug, Clone)]
pub struct InspectorApiClient {
    base_url: String,
    client: Client,
    retry: RetryPolicy,
}

impl InspectorApiClient {
    /// Create new inspector client
    pub fn new(base_url: impl Into<String>, retry: RetryPolicy) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            base_url,
            client,
            retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Index descriptor, retried on transient failures
    pub async fn info(&self) -> Result<IndexDescriptor> {
        retry_with_backoff(&self.retry, "Index info request", || self.get_json("/info")).await
    }

    /// One sampled batch from `/list` (single attempt)
    pub async fn list(&self, count: usize) -> Result<Vec<VectorRecord>> {
        let page: ListResponse = self.get_json(&format!("/list?count={}", count)).await?;
        debug!("Listed {} vectors", page.vectors.len());
        Ok(page.vectors)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| InspectorError::network(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InspectorError::network(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            )));
        }

        // Decode failures count as transient
        response
            .json()
            .await
            .map_err(|e| InspectorError::network(format!("Invalid response from {}: {}", url, e)))
    }
}

#[async_trait]
impl BatchSource for InspectorApiClient {
    async fn fetch_batch(&self, _dimension: usize, batch_size: usize) -> Result<Vec<VectorRecord>> {
        self.list(batch_size).await
    }
}
