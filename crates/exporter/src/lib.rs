//! Progressive vector export
//!
//! Repeatedly samples a similarity-only index with random query vectors and
//! deduplicates the results until a stop condition is met

mod accumulator;
mod exporter;
mod manifest;
mod policy;
mod retry;
mod source;

pub use accumulator::{Accumulator, MergeStats};
pub use exporter::{BatchReport, ProgressiveExporter};
pub use manifest::{
    bulk_export_command, completion_percentage, export_timestamp, ExportManifest, StopReason,
};
pub use policy::{BatchErrorMode, ExportPolicy};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use source::{random_query_vector, BatchSource, IndexBatchSource, RetryingSource};
