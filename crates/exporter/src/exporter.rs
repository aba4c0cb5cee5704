use inspector_common::{InspectorError, Result};
use tracing::{debug, info, warn};

use crate::accumulator::{Accumulator, MergeStats};
use crate::manifest::{ExportManifest, StopReason};
use crate::policy::{BatchErrorMode, ExportPolicy};
use crate::source::BatchSource;

/// Progress after one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// 1-based batch number
    pub batch: usize,
    pub returned: usize,
    pub new_records: usize,
    pub rejected: usize,
    /// Unique records collected so far
    pub unique_total: usize,
    pub declared_total: u64,
}

/// Collects distinct vectors from a similarity-only index, batch by batch
#[derive(Debug, Clone)]
pub struct ProgressiveExporter {
    policy: ExportPolicy,
}

/// Loop state carried between batches
struct LoopState {
    batches: usize,
    empty_streak: usize,
}

impl ProgressiveExporter {
    pub fn new(policy: ExportPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ExportPolicy {
        &self.policy
    }

    /// Export as many distinct vectors as the policy allows
    pub async fn export<S: BatchSource + ?Sized>(
        &self,
        source: &S,
        index_name: &str,
        declared_total: u64,
        dimension: usize,
    ) -> Result<ExportManifest> {
        self.export_with_progress(source, index_name, declared_total, dimension, |_| {})
            .await
    }

    /// Same as [`export`](Self::export), calling `on_batch` after every merged batch
    pub async fn export_with_progress<S, F>(
        &self,
        source: &S,
        index_name: &str,
        declared_total: u64,
        dimension: usize,
        mut on_batch: F,
    ) -> Result<ExportManifest>
    where
        S: BatchSource + ?Sized,
        F: FnMut(&BatchReport),
    {
        if dimension == 0 {
            return Err(InspectorError::invalid_input(
                "Export dimension must be positive",
            ));
        }

        info!(
            "Starting progressive export of {} - declared: {}, dimension: {}, max batches: {}",
            index_name,
            declared_total,
            dimension,
            self.policy.effective_max_batches()
        );

        let mut accumulator = Accumulator::new(dimension);
        let mut state = LoopState {
            batches: 0,
            empty_streak: 0,
        };

        let stop_reason = loop {
            let batch = match source.fetch_batch(dimension, self.policy.batch_size).await {
                Ok(batch) => batch,
                Err(e) => match self.policy.on_batch_error {
                    BatchErrorMode::Abort => return Err(e),
                    BatchErrorMode::StopEarly => {
                        warn!(
                            "Batch {} failed, keeping {} collected vectors: {}",
                            state.batches + 1,
                            accumulator.len(),
                            e
                        );
                        break StopReason::Interrupted;
                    }
                },
            };

            state.batches += 1;
            let stats = accumulator.merge(batch);

            let report = BatchReport {
                batch: state.batches,
                returned: stats.returned,
                new_records: stats.new_records,
                rejected: stats.rejected,
                unique_total: accumulator.len(),
                declared_total,
            };
            debug!(
                "Batch {}: {} new of {} (total {}/{})",
                report.batch, report.new_records, report.returned, report.unique_total, declared_total
            );
            on_batch(&report);

            if let Some(reason) =
                self.check_termination(&mut state, &stats, accumulator.len(), declared_total)
            {
                break reason;
            }

            if !self.policy.batch_delay.is_zero() {
                tokio::time::sleep(self.policy.batch_delay).await;
            }
        };

        if accumulator.rejected() > 0 {
            warn!(
                "{} vectors dropped for not matching dimension {}",
                accumulator.rejected(),
                dimension
            );
        }

        let manifest = ExportManifest::new(
            index_name,
            declared_total,
            dimension,
            state.batches,
            stop_reason,
            accumulator.into_records(),
        );

        info!(
            "Export finished ({:?}) - {} vectors in {} batches",
            stop_reason, manifest.vectors_fetched, manifest.batches_used
        );

        Ok(manifest)
    }

    /// Stop conditions in priority order: complete, capped, exhausted, saturated
    fn check_termination(
        &self,
        state: &mut LoopState,
        stats: &MergeStats,
        unique_total: usize,
        declared_total: u64,
    ) -> Option<StopReason> {
        if stats.new_records == 0 {
            state.empty_streak += 1;
        } else {
            state.empty_streak = 0;
        }

        if state.batches < self.policy.min_batches {
            return None;
        }

        if unique_total as u64 >= declared_total {
            return Some(StopReason::Complete);
        }

        if state.batches >= self.policy.effective_max_batches() {
            return Some(StopReason::Capped);
        }

        if state.empty_streak >= self.policy.empty_batch_limit.max(1) {
            info!(
                "No new vectors in last {} batches, stopping",
                state.empty_streak
            );
            return Some(StopReason::Exhausted);
        }

        let novelty_floor = stats.returned as f64 * self.policy.min_novelty_ratio;
        if state.batches > self.policy.novelty_grace_batches
            && (stats.new_records as f64) < novelty_floor
        {
            info!(
                "Only {} of {} vectors in batch {} were new, stopping",
                stats.new_records, stats.returned, state.batches
            );
            return Some(StopReason::Saturated);
        }

        None
    }
}
