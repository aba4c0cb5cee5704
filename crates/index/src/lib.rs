//! Vectorize index access
//!
//! Data model, the `VectorIndex` capability, the Cloudflare REST client
//! and an in-memory index for offline replay and tests

mod client;
mod index_trait;
mod memory;
mod types;

pub use client::VectorizeClient;
pub use index_trait::VectorIndex;
pub use memory::{cosine_similarity, MemoryIndex};
pub use types::{
    DistanceMetric, IndexDescriptor, MetadataMode, QueryOptions, VectorRecord, MAX_TOP_K,
    MAX_TOP_K_WITH_VALUES,
};
