use async_trait::async_trait;
use inspector_common::{AppConfig, InspectorError, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::index_trait::VectorIndex;
use crate::types::{DistanceMetric, IndexDescriptor, QueryOptions, VectorRecord};

/// Cloudflare Vectorize REST client
#[derive(Debug, Clone)]
pub struct VectorizeClient {
    index_url: String,
    api_token: String,
    client: Client,
}

/// Cloudflare v4 response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct IndexDetails {
    name: String,
    #[serde(default)]
    description: Option<String>,
    config: IndexConfig,
}

#[derive(Debug, Deserialize)]
struct IndexConfig {
    dimensions: usize,
    #[serde(default)]
    metric: Option<DistanceMetric>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexInfo {
    #[serde(default)]
    vector_count: u64,
    #[serde(default)]
    processed_up_to_datetime: Option<String>,
    #[serde(default)]
    processed_up_to_mutation: Option<String>,
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    vector: &'a [f32],
    #[serde(flatten)]
    options: &'a QueryOptions,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    matches: Vec<VectorRecord>,
}

#[derive(Debug, Serialize)]
struct GetByIdsBody<'a> {
    ids: &'a [String],
}

impl VectorizeClient {
    /// Create new Vectorize client
    pub fn new(
        api_base_url: &str,
        account_id: &str,
        api_token: impl Into<String>,
        index_name: impl Into<String>,
    ) -> Result<Self> {
        let index_name = index_name.into();
        let api_token = api_token.into();

        if account_id.trim().is_empty() || api_token.trim().is_empty() {
            return Err(InspectorError::config(
                "Cloudflare account id and API token are required",
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        let index_url = format!(
            "{}/accounts/{}/vectorize/v2/indexes/{}",
            api_base_url.trim_end_matches('/'),
            account_id.trim(),
            index_name
        );

        info!("Vectorize client initialized: {}", index_name);
        Ok(Self {
            index_url,
            api_token,
            client,
        })
    }

    /// Create client from application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            &config.account_id,
            config.api_token.clone(),
            config.index_name.clone(),
        )
    }

    /// Send request and unwrap the v4 envelope
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| InspectorError::network(format!("Vectorize request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InspectorError::network(format!("Failed to read Vectorize response: {}", e)))?;

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                InspectorError::serialization(format!("Unexpected Vectorize response: {}", e))
            } else {
                InspectorError::vector_index(format!("Vectorize API returned {}", status))
            }
        })?;

        if !status.is_success() || !envelope.success {
            let messages = envelope
                .errors
                .iter()
                .map(|e| format!("{} (code {})", e.message, e.code))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(InspectorError::vector_index(format!(
                "Vectorize API returned {}: {}",
                status, messages
            )));
        }

        envelope
            .result
            .ok_or_else(|| InspectorError::vector_index("Vectorize response has no result"))
    }
}

#[async_trait]
impl VectorIndex for VectorizeClient {
    async fn describe(&self) -> Result<IndexDescriptor> {
        let details: IndexDetails = self.send(self.client.get(&self.index_url)).await?;
        let info: IndexInfo = self
            .send(self.client.get(format!("{}/info", self.index_url)))
            .await?;

        Ok(IndexDescriptor {
            name: details.name,
            description: details.description,
            dimensions: details.config.dimensions,
            metric: details.config.metric,
            vector_count: info.vector_count,
            processed_up_to_datetime: info.processed_up_to_datetime,
            processed_up_to_mutation: info.processed_up_to_mutation,
        })
    }

    async fn query(&self, vector: &[f32], options: &QueryOptions) -> Result<Vec<VectorRecord>> {
        let options = options.clone().clamped();
        debug!(
            "Querying Vectorize - dimension: {}, topK: {}",
            vector.len(),
            options.top_k
        );

        let body = QueryBody {
            vector,
            options: &options,
        };
        let result: QueryResult = self
            .send(
                self.client
                    .post(format!("{}/query", self.index_url))
                    .json(&body),
            )
            .await?;

        Ok(result.matches)
    }

    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<VectorRecord>> {
        debug!("Fetching {} vectors by id", ids.len());

        self.send(
            self.client
                .post(format!("{}/get_by_ids", self.index_url))
                .json(&GetByIdsBody { ids }),
        )
        .await
    }
}
