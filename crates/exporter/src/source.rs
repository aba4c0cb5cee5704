use async_trait::async_trait;
use inspector_common::Result;
use inspector_index::{QueryOptions, VectorIndex, VectorRecord};
use rand::Rng;

use crate::retry::{retry_with_backoff, RetryPolicy};

/// Something that hands out one batch of sampled vectors per call
#[async_trait]
pub trait BatchSource: Send + Sync {
    async fn fetch_batch(&self, dimension: usize, batch_size: usize) -> Result<Vec<VectorRecord>>;
}

/// Random vector with components uniform in `[-1, 1)`
pub fn random_query_vector(dimension: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..dimension).map(|_| rng.gen_range(-1.0f32..1.0)).collect()
}

/// Samples an index directly with a fresh random query per batch
pub struct IndexBatchSource<'a, I: VectorIndex + ?Sized> {
    index: &'a I,
}

impl<'a, I: VectorIndex + ?Sized> IndexBatchSource<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }
}

#[async_trait]
impl<'a, I: VectorIndex + ?Sized> BatchSource for IndexBatchSource<'a, I> {
    async fn fetch_batch(&self, dimension: usize, batch_size: usize) -> Result<Vec<VectorRecord>> {
        let vector = random_query_vector(dimension);
        self.index
            .query(&vector, &QueryOptions::with_values(batch_size))
            .await
    }
}

/// Wraps a source so each batch fetch is retried with backoff
pub struct RetryingSource<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: BatchSource> RetryingSource<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<S: BatchSource> BatchSource for RetryingSource<S> {
    async fn fetch_batch(&self, dimension: usize, batch_size: usize) -> Result<Vec<VectorRecord>> {
        retry_with_backoff(&self.policy, "Batch fetch", || {
            self.inner.fetch_batch(dimension, batch_size)
        })
        .await
    }
}
