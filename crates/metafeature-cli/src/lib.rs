//! Metafeature Extraction Driver
//!
//! Batch tool that walks a directory of preprocessed datasets, extracts
//! metafeatures from each one and writes them as JSON, either streamed one
//! object per line or collected into a single array.

use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;
mod error;
mod pipeline;
mod settings;
mod sink;

pub use cli::Cli;
pub use error::{PipelineError, SettingsError, SinkError};
pub use pipeline::{run, MetafeatureStream, RunSummary};
pub use settings::{parse_option, Settings, DEFAULT_FEATURES, ENV_PREFIX};
pub use sink::{open_sink, JsonArraySink, JsonLinesSink, OutputFormat, RecordSink};

/// Initialize logging on standard error (`RUST_LOG` overrides the `info` default)
pub fn init_logging() -> Result<(), SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
