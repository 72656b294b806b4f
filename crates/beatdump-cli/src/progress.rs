use beatdump_fetch::IncrementReport;
use beatdump_runtime::ChunkObserver;
use beatdump_types::Chunk;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;

const TEMPLATE: &str = "{spinner:.green} chunk {prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}";

/// Renders chunk progress on stderr; hidden when quiet or not a terminal
pub struct ProgressObserver {
    bar: ProgressBar,
    chunk_count: usize,
    skipped: usize,
}

impl ProgressObserver {
    pub fn new(chunk_count: usize, quiet: bool) -> Self {
        let bar = if quiet || !std::io::stderr().is_terminal() {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        bar.set_style(
            ProgressStyle::with_template(TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self {
            bar,
            chunk_count,
            skipped: 0,
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ChunkObserver for ProgressObserver {
    fn on_chunk_start(&mut self, chunk: &Chunk, planned_increments: usize) {
        self.skipped = 0;
        self.bar.reset();
        self.bar.set_length(planned_increments as u64);
        self.bar
            .set_prefix(format!("{}/{}", chunk.index + 1, self.chunk_count));
        self.bar.set_message(chunk.range.to_string());
    }

    fn on_increment(&mut self, increment: &IncrementReport) {
        if increment.skip_reason().is_some() {
            self.skipped += 1;
            self.bar.set_message(format!("{} skipped", self.skipped));
        }
        self.bar.inc(1);
    }
}
