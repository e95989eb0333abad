//! Metafeature Extraction - Main Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use feature_engine::NativeExtractor;
use metafeature_cli::{init_logging, open_sink, run, Cli};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging().context("Failed to install log subscriber")?;

    info!("=== mfe-extract v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = cli.settings().context("Failed to load settings")?;
    info!("Searching {} ({:?} output)", settings.pattern, settings.format);

    let mut sink = open_sink(&settings).context("Failed to open output")?;
    let summary = run::<NativeExtractor>(&settings, sink.as_mut())
        .context("Metafeature extraction aborted")?;

    if summary.failed > 0 {
        info!("{} datasets were skipped after errors", summary.failed);
    }
    Ok(())
}
