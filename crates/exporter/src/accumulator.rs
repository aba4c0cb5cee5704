use inspector_index::VectorRecord;
use std::collections::HashSet;
use tracing::warn;

/// Outcome of merging one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Records the batch returned
    pub returned: usize,
    /// Records not seen in earlier batches
    pub new_records: usize,
    /// Records dropped for having the wrong dimension
    pub rejected: usize,
}

/// Unique records collected across batches, in first-seen order
#[derive(Debug, Clone)]
pub struct Accumulator {
    dimension: usize,
    seen: HashSet<String>,
    records: Vec<VectorRecord>,
    rejected: usize,
}

impl Accumulator {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            seen: HashSet::new(),
            records: Vec::new(),
            rejected: 0,
        }
    }

    /// Merge a batch, keeping the first copy of each id
    pub fn merge(&mut self, batch: Vec<VectorRecord>) -> MergeStats {
        let mut stats = MergeStats {
            returned: batch.len(),
            ..MergeStats::default()
        };

        for record in batch {
            if record.dimension() != self.dimension {
                warn!(
                    "Dropping vector {} with dimension {} (expected {})",
                    record.id,
                    record.dimension(),
                    self.dimension
                );
                stats.rejected += 1;
                continue;
            }

            if self.seen.insert(record.id.clone()) {
                self.records.push(record);
                stats.new_records += 1;
            }
        }

        self.rejected += stats.rejected;
        stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records dropped over the whole run
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn into_records(self) -> Vec<VectorRecord> {
        self.records
    }
}
