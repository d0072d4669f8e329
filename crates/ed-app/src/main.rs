//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use ed_core::{RowSource, Session};
use ed_data::CsvSource;
use ed_views::{default_views, SharedSurface};
use parking_lot::Mutex;
use tracing::info;

mod app_config;
mod shell;
mod text_surface;

use app_config::AppConfig;
use text_surface::TextSurface;

/// Browse school board energy use from a CSV report
#[derive(Parser, Debug)]
#[command(name = "energy-dash")]
struct Args {
    /// CSV file to load; overrides the path in the config file
    data: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with rendered panels
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(data) = args.data {
        config.dataset.path = data;
    }
    if config.dataset.path.as_os_str().is_empty() {
        anyhow::bail!("no data file given; pass a CSV path or set dataset.path in the config");
    }

    info!(path = %config.dataset.path.display(), "Starting energy dashboard");
    run(config).await
}

async fn run(config: AppConfig) -> Result<()> {
    let source = CsvSource::new(config.dataset.clone());
    let raw = source.load().await?;
    info!(source = source.source_name(), records = raw.len(), "Loaded records");

    let surface = Arc::new(Mutex::new(TextSurface::new()));
    let shared: SharedSurface = surface.clone();
    let session = Session::start(raw, default_views(shared, &config.views), config.engine.clone())?;

    // The shell is usable straight away; search results appear once the
    // indices finish building.
    let (built, shell) = tokio::join!(session.build_indices(), shell::run(&session, &surface, &source));
    built?;
    shell
}
