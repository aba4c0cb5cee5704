mod export_cli;
mod remote;

use anyhow::Result;
use clap::{Parser, Subcommand};
use inspector_common::{logger, AppConfig};
use inspector_index::{MemoryIndex, VectorIndex, VectorizeClient};
use std::path::PathBuf;
use std::sync::Arc;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "vectorize-inspector")]
#[command(about = "Inspect and export a Cloudflare Vectorize index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the inspector HTTP service
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Serve a previous export file from memory instead of Vectorize
        #[arg(long)]
        fixture: Option<PathBuf>,
    },

    /// Progressively export every reachable vector to a JSON file
    ExportAll {
        /// Output file (default: exports/export-<timestamp>.json)
        output: Option<PathBuf>,

        /// Inspector service URL
        #[arg(long)]
        api_url: Option<String>,
    },
}

async fn serve(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
    fixture: Option<PathBuf>,
) -> Result<()> {
    if let Some(host) = host {
        config.server_host = host;
    }
    if let Some(port) = port {
        config.server_port = port;
    }
    config.validate()?;

    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("Vectorize inspector starting...");
    tracing::info!("  Index: {}", config.index_name);
    tracing::info!("  Bind:  {}", config.server_bind_address());

    let index: Arc<dyn VectorIndex> = match &fixture {
        Some(path) => {
            tracing::info!("  Fixture: {}", path.display());
            Arc::new(MemoryIndex::from_manifest_file(path)?)
        }
        None => Arc::new(VectorizeClient::from_config(&config)?),
    };

    println!("Server listening on http://{}", config.server_bind_address());

    inspector_server::start_server(config, index).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();

    let config = AppConfig::from_env()?;

    match cli.command {
        Some(Commands::Serve { host, port, fixture }) => {
            serve(config, host, port, fixture).await?;
        }
        Some(Commands::ExportAll { output, api_url }) => {
            logger::setup_file_logging(&config.log_dir, &config.log_level)?;

            let api_url = api_url.unwrap_or_else(|| config.inspector_api_url.clone());
            if let Err(e) = export_cli::run_export(&config, &api_url, output).await {
                tracing::error!("Export failed: {:#}", e);
                eprintln!("\nError: {:#}", e);
                eprintln!("\nMake sure the inspector service is running: vectorize-inspector serve");
                std::process::exit(1);
            }
        }
        None => {
            serve(config, None, None, None).await?;
        }
    }

    Ok(())
}
