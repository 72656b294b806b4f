use crate::args::ExtractArgs;
use crate::progress::ProgressObserver;
use anyhow::{Context, Result, bail};
use beatdump_runtime::{Config, RunReport, http_pipeline, run_dir};
use beatdump_types::TimeRange;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::path::Path;

pub fn handle(mut config: Config, args: ExtractArgs, quiet: bool) -> Result<()> {
    let ranges = collect_ranges(&args)?;
    apply_overrides(&mut config, args);
    config.validate()?;

    let mut failed_chunks = 0;
    for range in &ranges {
        let sink_dir = run_dir(&config.output.dir, range);
        let pipeline = http_pipeline(&config, &sink_dir)?;

        let mut progress = ProgressObserver::new(pipeline.chunks(range)?.len(), quiet);
        let result = pipeline.run(range, &mut progress);
        progress.finish();

        let report = result.with_context(|| format!("Extraction of {} failed", range))?;
        failed_chunks += report.failed.len();
        if !quiet {
            print_summary(range, &sink_dir, &report);
        }
    }

    if failed_chunks > 0 {
        bail!("{} chunk(s) could not be written", failed_chunks);
    }
    Ok(())
}

fn collect_ranges(args: &ExtractArgs) -> Result<Vec<TimeRange>> {
    let mut ranges = Vec::new();
    if let (Some(start), Some(end)) = (&args.start, &args.end) {
        ranges.push(TimeRange::parse(start, end)?);
    }
    ranges.extend(args.range.iter().copied());
    Ok(ranges)
}

/// Command-line values take precedence over the config file
fn apply_overrides(config: &mut Config, args: ExtractArgs) {
    if let Some(url) = args.url {
        config.backend.url = url;
    }
    if let Some(filter) = args.filter {
        config.backend.filter = Some(filter);
    }
    if let Some(step_ms) = args.step_ms {
        config.extract.step_ms = step_ms;
    }
    if let Some(limit) = args.limit {
        config.extract.limit = limit;
    }
    if let Some(cut_off_secs) = args.cut_off_secs {
        config.extract.cut_off_secs = cut_off_secs;
    }
    if let Some(window) = args.window {
        config.extract.window = window.into();
    }
    if let Some(policy) = args.on_chunk_error {
        config.extract.on_chunk_error = policy.into();
    }
    if let Some(format) = args.format {
        config.output.format = format.into();
    }
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }
}

fn print_summary(range: &TimeRange, sink_dir: &Path, report: &RunReport) {
    let color = std::io::stdout().is_terminal();
    let status = if report.failed.is_empty() {
        "done"
    } else {
        "partial"
    };
    let status = match (color, report.failed.is_empty()) {
        (false, _) => status.to_string(),
        (true, true) => status.green().to_string(),
        (true, false) => status.yellow().to_string(),
    };

    println!(
        "{} {}: {} chunk(s), {} record(s), {} written, {} omitted -> {}",
        status,
        range,
        report.chunks.len() + report.failed.len(),
        report.total_records(),
        report.total_written(),
        report.chunks.iter().map(|c| c.omitted).sum::<usize>(),
        sink_dir.display()
    );

    let skipped = report.total_skipped_increments();
    let dropped = report.total_dropped_estimate();
    if skipped > 0 || dropped > 0 {
        let line = format!(
            "  {} increment(s) skipped, ~{} record(s) beyond the page limit",
            skipped, dropped
        );
        if color {
            println!("{}", line.yellow());
        } else {
            println!("{}", line);
        }
    }

    for failure in &report.failed {
        let line = format!("  chunk {} failed: {}", failure.chunk.range, failure.message);
        if color {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
}
