use crate::types::{IndexDescriptor, QueryOptions, VectorRecord};
use async_trait::async_trait;
use inspector_common::Result;

/// Access to a similarity-only vector index
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Describe the index (dimension, declared count, metric)
    async fn describe(&self) -> Result<IndexDescriptor>;

    /// Return the nearest matches for `vector`
    async fn query(&self, vector: &[f32], options: &QueryOptions) -> Result<Vec<VectorRecord>>;

    /// Fetch records by id; unknown ids are omitted from the result
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<VectorRecord>>;
}
