// Runtime layer - config, chunked pipeline and file sinks
// Wires the fetch and engine crates together; the CLI only parses arguments
// and reports on what comes back from here.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod sink;

pub use config::{Config, resolve_config_path};
pub use error::{Error, Result};
pub use pipeline::{
    ChunkFailure, ChunkFailurePolicy, ChunkObserver, ChunkSummary, NoopObserver, Pipeline,
    RunReport,
};
pub use sink::{OutputFormat, Sink, run_dir};

use beatdump_fetch::{HttpTransport, WindowedFetcher};
use std::path::Path;

/// Pipeline against the configured HTTP backend, writing under `sink_dir`
pub fn http_pipeline(config: &Config, sink_dir: &Path) -> Result<Pipeline<HttpTransport>> {
    config.validate()?;
    let transport = HttpTransport::new(&config.connection())?;
    let fetcher = WindowedFetcher::new(transport, config.fetch_settings()?)?;
    Pipeline::new(
        fetcher,
        Sink::new(sink_dir, config.output.format),
        config.cut_off()?,
        config.extract.on_chunk_error,
    )
}
