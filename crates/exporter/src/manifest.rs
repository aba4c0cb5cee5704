use chrono::{DateTime, Utc};
use inspector_index::{IndexDescriptor, VectorRecord};
use serde::{Deserialize, Serialize};

/// Why the export loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
    /// Collected at least the declared total
    Complete,
    /// Hit the batch cap
    Capped,
    /// Several batches in a row brought nothing new
    Exhausted,
    /// A batch brought too few new records
    Saturated,
    /// A batch failed and the run kept what it had
    Interrupted,
}

/// Summary of one export run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportManifest {
    pub export_date: DateTime<Utc>,
    pub index_name: String,
    pub total_vectors_in_index: u64,
    pub vectors_fetched: usize,
    /// `None` when the index declares no vectors
    pub completion_percentage: Option<u32>,
    pub batches_used: usize,
    pub stop_reason: StopReason,
    pub dimensions: usize,
    pub vectors: Vec<VectorRecord>,
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_info: Option<IndexDescriptor>,
}

impl ExportManifest {
    /// Assemble the manifest for a finished run
    pub fn new(
        index_name: impl Into<String>,
        declared_total: u64,
        dimensions: usize,
        batches_used: usize,
        stop_reason: StopReason,
        vectors: Vec<VectorRecord>,
    ) -> Self {
        let index_name = index_name.into();
        let fetched = vectors.len();
        let completion = completion_percentage(fetched, declared_total);
        let note = export_note(&index_name, fetched, declared_total, batches_used, completion);

        Self {
            export_date: Utc::now(),
            index_name,
            total_vectors_in_index: declared_total,
            vectors_fetched: fetched,
            completion_percentage: completion,
            batches_used,
            stop_reason,
            dimensions,
            vectors,
            note,
            index_info: None,
        }
    }

    /// Whether every declared vector was fetched
    pub fn is_complete(&self) -> bool {
        self.vectors_fetched as u64 >= self.total_vectors_in_index
    }
}

/// Rounded share of declared vectors that were fetched
pub fn completion_percentage(fetched: usize, declared: u64) -> Option<u32> {
    if declared == 0 {
        return None;
    }
    Some((fetched as f64 / declared as f64 * 100.0).round() as u32)
}

/// Wrangler command that lists every vector of the index
pub fn bulk_export_command(index_name: &str) -> String {
    format!("wrangler vectorize list-vectors {} --count=1000", index_name)
}

/// Timestamp used in export file names, e.g. `2026-10-16T09-30-00`
pub fn export_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S").to_string()
}

fn export_note(
    index_name: &str,
    fetched: usize,
    declared: u64,
    batches: usize,
    completion: Option<u32>,
) -> String {
    if fetched == 0 && declared > 0 {
        format!(
            "No vectors found in {} batches. The index may be empty or still processing; for a complete export use: {}",
            batches,
            bulk_export_command(index_name)
        )
    } else if fetched as u64 >= declared {
        format!(
            "Complete export - all {} vectors fetched using {} batches.",
            fetched, batches
        )
    } else {
        format!(
            "Fetched {} of {} vectors ({}%) using {} batches. For complete export use: {}",
            fetched,
            declared,
            completion.unwrap_or(0),
            batches,
            bulk_export_command(index_name)
        )
    }
}
