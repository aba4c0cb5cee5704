use async_trait::async_trait;
use inspector_common::{InspectorError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::index_trait::VectorIndex;
use crate::types::{DistanceMetric, IndexDescriptor, MetadataMode, QueryOptions, VectorRecord};

/// In-process vector index ranked by cosine similarity
#[derive(Debug, Clone)]
pub struct MemoryIndex {
    name: String,
    dimensions: usize,
    records: Vec<VectorRecord>,
    positions: HashMap<String, usize>,
}

/// Fields of an export manifest needed to replay it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestSnapshot {
    index_name: String,
    dimensions: usize,
    #[serde(default)]
    vectors: Vec<VectorRecord>,
}

impl MemoryIndex {
    /// Create new empty index
    pub fn new(name: impl Into<String>, dimensions: usize) -> Self {
        Self {
            name: name.into(),
            dimensions,
            records: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Create index holding `records`
    pub fn with_records(
        name: impl Into<String>,
        dimensions: usize,
        records: impl IntoIterator<Item = VectorRecord>,
    ) -> Result<Self> {
        let mut index = Self::new(name, dimensions);
        for record in records {
            index.upsert(record)?;
        }
        Ok(index)
    }

    /// Load index from a previously written export manifest
    pub fn from_manifest_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            InspectorError::file_system(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let snapshot: ManifestSnapshot = serde_json::from_str(&data)?;

        let index = Self::with_records(snapshot.index_name, snapshot.dimensions, snapshot.vectors)?;
        info!(
            "Memory index loaded from {} - {} vectors",
            path.display(),
            index.len()
        );
        Ok(index)
    }

    /// Insert or replace a record
    pub fn upsert(&mut self, mut record: VectorRecord) -> Result<()> {
        if record.dimension() != self.dimensions {
            return Err(InspectorError::invalid_input(format!(
                "Vector {} has dimension {}, index expects {}",
                record.id,
                record.dimension(),
                self.dimensions
            )));
        }

        record.score = None;
        match self.positions.get(&record.id) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.positions.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
        Ok(())
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Cosine similarity; 0.0 when either vector has zero norm
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn describe(&self) -> Result<IndexDescriptor> {
        Ok(IndexDescriptor {
            name: self.name.clone(),
            description: Some("In-memory index".to_string()),
            dimensions: self.dimensions,
            metric: Some(DistanceMetric::Cosine),
            vector_count: self.records.len() as u64,
            processed_up_to_datetime: None,
            processed_up_to_mutation: None,
        })
    }

    async fn query(&self, vector: &[f32], options: &QueryOptions) -> Result<Vec<VectorRecord>> {
        if vector.len() != self.dimensions {
            return Err(InspectorError::invalid_input(format!(
                "Query vector has dimension {}, index expects {}",
                vector.len(),
                self.dimensions
            )));
        }

        let options = options.clone().clamped();

        let mut scored: Vec<(f32, &VectorRecord)> = self
            .records
            .iter()
            .map(|r| (cosine_similarity(vector, &r.values), r))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(options.top_k);

        Ok(scored
            .into_iter()
            .map(|(score, record)| {
                let mut record = record.clone();
                record.score = Some(score);
                if !options.return_values {
                    record.values.clear();
                }
                if options.return_metadata == MetadataMode::None {
                    record.metadata = None;
                }
                record
            })
            .collect())
    }

    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<VectorRecord>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.positions.get(id))
            .map(|&pos| self.records[pos].clone())
            .collect())
    }
}
