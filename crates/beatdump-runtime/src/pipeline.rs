// Range splitter and per-chunk pipeline
//
// fetch -> classify -> write, one chunk at a time. Chunks share no cursor or
// fetcher state; nothing is checkpointed, so a rerun starts from scratch.

use crate::sink::{OutputFormat, Sink};
use crate::{Error, Result};
use beatdump_engine::{normalize, tabulate};
use beatdump_fetch::{IncrementReport, SearchTransport, WindowedFetcher};
use beatdump_types::{Chunk, TimeRange};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{error, info};

/// What to do when writing a chunk fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkFailurePolicy {
    /// Stop the run and return the error
    #[default]
    Abort,
    /// Log the error, record it in the report and move to the next chunk
    Continue,
}

impl fmt::Display for ChunkFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkFailurePolicy::Abort => write!(f, "abort"),
            ChunkFailurePolicy::Continue => write!(f, "continue"),
        }
    }
}

/// Progress hooks; every method defaults to doing nothing
pub trait ChunkObserver {
    fn on_chunk_start(&mut self, _chunk: &Chunk, _planned_increments: usize) {}
    fn on_increment(&mut self, _increment: &IncrementReport) {}
    fn on_chunk_done(&mut self, _chunk: &Chunk) {}
}

pub struct NoopObserver;

impl ChunkObserver for NoopObserver {}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSummary {
    pub chunk: Chunk,
    /// Raw records fetched, duplicates included
    pub records: usize,
    /// Lines or rows written
    pub written: usize,
    pub omitted: usize,
    pub truncated_increments: usize,
    pub skipped_increments: usize,
    pub dropped_estimate: u64,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkFailure {
    pub chunk: Chunk,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub chunks: Vec<ChunkSummary>,
    pub failed: Vec<ChunkFailure>,
}

impl RunReport {
    pub fn total_records(&self) -> usize {
        self.chunks.iter().map(|c| c.records).sum()
    }

    pub fn total_written(&self) -> usize {
        self.chunks.iter().map(|c| c.written).sum()
    }

    pub fn total_skipped_increments(&self) -> usize {
        self.chunks.iter().map(|c| c.skipped_increments).sum()
    }

    pub fn total_dropped_estimate(&self) -> u64 {
        self.chunks.iter().map(|c| c.dropped_estimate).sum()
    }

    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.chunks.iter().flat_map(|c| c.files.iter())
    }
}

pub struct Pipeline<T> {
    fetcher: WindowedFetcher<T>,
    sink: Sink,
    cut_off: Duration,
    on_chunk_error: ChunkFailurePolicy,
}

impl<T: SearchTransport> Pipeline<T> {
    pub fn new(
        fetcher: WindowedFetcher<T>,
        sink: Sink,
        cut_off: Duration,
        on_chunk_error: ChunkFailurePolicy,
    ) -> Result<Self> {
        if cut_off <= Duration::zero() {
            return Err(Error::Config(format!(
                "cut-off must be positive, got {} s",
                cut_off.num_seconds()
            )));
        }
        Ok(Self {
            fetcher,
            sink,
            cut_off,
            on_chunk_error,
        })
    }

    pub fn fetcher(&self) -> &WindowedFetcher<T> {
        &self.fetcher
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    /// Chunks a run over `overall` will process
    pub fn chunks(&self, overall: &TimeRange) -> Result<Vec<Chunk>> {
        Ok(overall.split(self.cut_off)?)
    }

    /// Process every chunk of `overall` in order
    pub fn run(&self, overall: &TimeRange, observer: &mut dyn ChunkObserver) -> Result<RunReport> {
        let mut report = RunReport::default();

        for chunk in self.chunks(overall)? {
            info!("Getting records from {}", chunk.range);
            let planned = chunk.range.increment_count(self.fetcher.settings().step)?;
            observer.on_chunk_start(&chunk, planned);

            match self.process_chunk(&chunk, observer) {
                Ok(summary) => {
                    info!(
                        chunk = chunk.index,
                        records = summary.records,
                        written = summary.written,
                        omitted = summary.omitted,
                        skipped_increments = summary.skipped_increments,
                        "chunk written"
                    );
                    report.chunks.push(summary);
                }
                Err(err) => match self.on_chunk_error {
                    ChunkFailurePolicy::Abort => {
                        return Err(Error::Chunk {
                            range: chunk.range.to_string(),
                            source: Box::new(err),
                        });
                    }
                    ChunkFailurePolicy::Continue => {
                        error!(chunk = chunk.index, range = %chunk.range, "chunk failed: {}", err);
                        report.failed.push(ChunkFailure {
                            chunk,
                            message: err.to_string(),
                        });
                    }
                },
            }

            observer.on_chunk_done(&chunk);
        }

        Ok(report)
    }

    /// Fetch, classify and write a single chunk
    pub fn process_chunk(
        &self,
        chunk: &Chunk,
        observer: &mut dyn ChunkObserver,
    ) -> Result<ChunkSummary> {
        let fetched = self
            .fetcher
            .fetch_with(&chunk.range, |increment| observer.on_increment(increment));

        let (written, omitted, files) = match self.sink.format() {
            OutputFormat::Text => {
                let normalized = normalize(&fetched.records);
                let path = self.sink.write_text(&chunk.range, &normalized)?;
                (normalized.lines.len(), normalized.omitted.len(), vec![path])
            }
            OutputFormat::Csv => {
                let tables = tabulate(&fetched.records);
                let files = self.sink.write_tables(&chunk.range, &tables)?;
                (tables.row_count(), tables.omitted.len(), files)
            }
        };

        Ok(ChunkSummary {
            chunk: *chunk,
            records: fetched.records.len(),
            written,
            omitted,
            truncated_increments: fetched.truncated_increments(),
            skipped_increments: fetched.skipped_increments(),
            dropped_estimate: fetched.dropped_estimate(),
            files,
        })
    }
}
