use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Largest `topK` the index accepts when values are returned
pub const MAX_TOP_K_WITH_VALUES: usize = 50;

/// Largest `topK` the index accepts for id/score-only queries
pub const MAX_TOP_K: usize = 100;

/// A single stored vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Unique identifier
    pub id: String,

    /// Embedding values
    #[serde(default)]
    pub values: Vec<f32>,

    /// Arbitrary metadata attached at insert time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,

    /// Namespace the vector was inserted into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Similarity score relative to the query that returned it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl VectorRecord {
    /// Create record with values only
    pub fn new(id: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            values,
            metadata: None,
            namespace: None,
            score: None,
        }
    }

    /// Embedding dimension
    pub fn dimension(&self) -> usize {
        self.values.len()
    }
}

/// Distance metric configured on the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceMetric {
    Cosine,
    Euclidean,
    DotProduct,
}

/// Index description as reported by the index service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDescriptor {
    /// Index name
    #[serde(default)]
    pub name: String,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Embedding dimension
    pub dimensions: usize,

    /// Distance metric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<DistanceMetric>,

    /// Declared number of stored vectors (may lag recent mutations)
    #[serde(default, alias = "vectorsCount")]
    pub vector_count: u64,

    /// Timestamp of the last processed mutation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_up_to_datetime: Option<String>,

    /// Identifier of the last processed mutation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_up_to_mutation: Option<String>,
}

/// Which metadata the index should return with matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataMode {
    None,
    Indexed,
    All,
}

/// Similarity query options
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    /// Number of matches requested
    pub top_k: usize,

    /// Return embedding values with matches
    pub return_values: bool,

    /// Metadata returned with matches
    pub return_metadata: MetadataMode,
}

impl QueryOptions {
    /// Query returning values and all metadata, clamped to the values cap
    pub fn with_values(top_k: usize) -> Self {
        Self {
            top_k,
            return_values: true,
            return_metadata: MetadataMode::All,
        }
        .clamped()
    }

    /// Clamp `top_k` to what the index accepts for these options
    pub fn clamped(mut self) -> Self {
        let cap = if self.return_values {
            MAX_TOP_K_WITH_VALUES
        } else {
            MAX_TOP_K
        };
        self.top_k = self.top_k.min(cap);
        self
    }
}
