use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use inspector_common::AppConfig;
use inspector_exporter::{
    bulk_export_command, export_timestamp, ExportManifest, ExportPolicy, ProgressiveExporter,
    RetryPolicy, RetryingSource,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::remote::InspectorApiClient;

/// Default output file: `<export_dir>/export-<timestamp>.json`
pub fn default_output_path(export_dir: &Path, at: DateTime<Utc>) -> PathBuf {
    export_dir.join(format!("export-{}.json", export_timestamp(at)))
}

/// Write manifest as pretty JSON, creating parent directories; returns the file size
pub async fn write_manifest(manifest: &ExportManifest, path: &Path) -> Result<u64> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let data = serde_json::to_string_pretty(manifest)?;
    tokio::fs::write(path, data)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let size = tokio::fs::metadata(path).await?.len();
    Ok(size)
}

/// Export every reachable vector through a running inspector service
pub async fn run_export(
    config: &AppConfig,
    api_url: &str,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let retry = RetryPolicy::new(config.export_retry_attempts, Duration::from_secs(1));
    let client = InspectorApiClient::new(api_url, retry)?;

    println!("Getting index information from {}...", client.base_url());
    let info = client
        .info()
        .await
        .context("Failed to fetch index information")?;
    println!("  Dimensions:    {}", info.dimensions);
    println!("  Total vectors: {}", info.vector_count);

    let index_name = if info.name.is_empty() {
        config.index_name.clone()
    } else {
        info.name.clone()
    };

    let policy = ExportPolicy::cli_from_config(config);
    println!(
        "\nFetching vectors in batches of {} (up to {} batches)...",
        policy.batch_size,
        policy.effective_max_batches()
    );

    let progress = ProgressBar::new(info.vector_count);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} vectors {msg}")?
            .progress_chars("#>-"),
    );

    let exporter = ProgressiveExporter::new(policy);
    let source = RetryingSource::new(client.clone(), retry);
    let manifest = exporter
        .export_with_progress(
            &source,
            &index_name,
            info.vector_count,
            info.dimensions,
            |report| {
                progress.set_position(report.unique_total as u64);
                progress.set_message(format!(
                    "(batch {}: {} new)",
                    report.batch, report.new_records
                ));
            },
        )
        .await;
    progress.finish_and_clear();
    let manifest = manifest.context("Export aborted")?;

    let path = output.unwrap_or_else(|| default_output_path(&config.export_dir, Utc::now()));
    let size = write_manifest(&manifest, &path).await?;
    info!("Export written to {} ({} bytes)", path.display(), size);

    let completion = manifest
        .completion_percentage
        .map(|p| format!("{}%", p))
        .unwrap_or_else(|| "n/a".to_string());

    println!("\nExport completed ({:?})", manifest.stop_reason);
    println!(
        "  Vectors fetched: {}/{} ({})",
        manifest.vectors_fetched, manifest.total_vectors_in_index, completion
    );
    println!("  Batches used:    {}", manifest.batches_used);
    println!("  Output file:     {}", path.display());
    println!("  File size:       {:.2} MB", size as f64 / 1024.0 / 1024.0);

    if !manifest.is_complete() {
        println!("\nNote: only {} of the vectors were fetched.", completion);
        println!("  For a complete export use Wrangler CLI:");
        println!("  {} > {}", bulk_export_command(&index_name), path.display());
    }

    Ok(path)
}
