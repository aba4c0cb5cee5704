use inspector_common::AppConfig;
use inspector_exporter::ExportPolicy;
use inspector_index::VectorIndex;
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Index being inspected
    pub index: Arc<dyn VectorIndex>,

    /// Policy for `/export` runs
    pub export_policy: ExportPolicy,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig, index: Arc<dyn VectorIndex>) -> Self {
        let export_policy = ExportPolicy::service_from_config(&config);

        Self {
            config,
            index,
            export_policy,
        }
    }

    /// Replace the export policy
    pub fn with_export_policy(mut self, policy: ExportPolicy) -> Self {
        self.export_policy = policy;
        self
    }
}
