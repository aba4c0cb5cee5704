use inspector_common::AppConfig;
use inspector_index::MAX_TOP_K_WITH_VALUES;
use std::time::Duration;

/// What the exporter does when a batch fetch fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchErrorMode {
    /// Propagate the error and abandon the run
    Abort,
    /// End the loop and keep what was collected
    StopEarly,
}

/// Termination and pacing parameters of one export run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPolicy {
    /// Records requested per query
    pub batch_size: usize,

    /// Hard cap on batches
    pub max_batches: usize,

    /// Batches attempted before any stop condition applies
    pub min_batches: usize,

    /// Consecutive batches with no new records before stopping
    pub empty_batch_limit: usize,

    /// Batches with a smaller share of new records count as saturated
    pub min_novelty_ratio: f64,

    /// Number of batches run before the novelty check applies
    pub novelty_grace_batches: usize,

    /// Pause between batches
    pub batch_delay: Duration,

    /// Failure behaviour
    pub on_batch_error: BatchErrorMode,
}

impl ExportPolicy {
    /// Standalone CLI export: 100 batches, aborts on failure
    pub fn cli() -> Self {
        Self {
            max_batches: 100,
            on_batch_error: BatchErrorMode::Abort,
            ..Self::base()
        }
    }

    /// Export run inside the inspector service: 10 batches, keeps partial results
    pub fn service() -> Self {
        Self {
            max_batches: 10,
            on_batch_error: BatchErrorMode::StopEarly,
            ..Self::base()
        }
    }

    /// CLI preset with thresholds from configuration
    pub fn cli_from_config(config: &AppConfig) -> Self {
        Self {
            max_batches: config.cli_max_batches,
            ..Self::cli().with_thresholds(config)
        }
    }

    /// Service preset with thresholds from configuration
    pub fn service_from_config(config: &AppConfig) -> Self {
        Self {
            max_batches: config.service_max_batches,
            ..Self::service().with_thresholds(config)
        }
    }

    /// Override the pause between batches
    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Override the batch cap
    pub fn with_max_batches(mut self, max_batches: usize) -> Self {
        self.max_batches = max_batches;
        self
    }

    /// Batch cap after applying the minimum
    pub fn effective_max_batches(&self) -> usize {
        self.max_batches.max(self.min_batches).max(1)
    }

    fn with_thresholds(mut self, config: &AppConfig) -> Self {
        self.min_batches = config.export_min_batches;
        self.empty_batch_limit = config.export_empty_batch_limit;
        self.min_novelty_ratio = config.export_min_novelty_ratio;
        self.novelty_grace_batches = config.export_novelty_grace_batches;
        self.batch_delay = Duration::from_millis(config.export_batch_delay_ms);
        self
    }

    fn base() -> Self {
        Self {
            batch_size: MAX_TOP_K_WITH_VALUES,
            max_batches: 10,
            min_batches: 3,
            empty_batch_limit: 3,
            min_novelty_ratio: 0.05,
            novelty_grace_batches: 5,
            batch_delay: Duration::from_millis(100),
            on_batch_error: BatchErrorMode::StopEarly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let cli = ExportPolicy::cli();
        assert_eq!(cli.max_batches, 100);
        assert_eq!(cli.batch_size, 50);
        assert_eq!(cli.on_batch_error, BatchErrorMode::Abort);

        let service = ExportPolicy::service();
        assert_eq!(service.max_batches, 10);
        assert_eq!(service.min_batches, 3);
        assert_eq!(service.on_batch_error, BatchErrorMode::StopEarly);
    }

    #[test]
    fn test_from_config_overrides() {
        let config = AppConfig {
            service_max_batches: 4,
            export_batch_delay_ms: 0,
            export_min_novelty_ratio: 0.2,
            ..AppConfig::default()
        };

        let policy = ExportPolicy::service_from_config(&config);
        assert_eq!(policy.max_batches, 4);
        assert_eq!(policy.batch_delay, Duration::ZERO);
        assert_eq!(policy.min_novelty_ratio, 0.2);
    }

    #[test]
    fn test_minimum_beats_cap() {
        let policy = ExportPolicy::service().with_max_batches(1);
        assert_eq!(policy.effective_max_batches(), 3);
    }
}
