use crate::args::PlanArgs;
use anyhow::Result;
use beatdump_runtime::Config;
use beatdump_types::{TimeRange, duration_from_millis, duration_from_secs};

pub fn handle(config: &Config, args: PlanArgs) -> Result<()> {
    let range = TimeRange::parse(&args.start, &args.end)?;
    let step_ms = args.step_ms.unwrap_or(config.extract.step_ms);
    let cut_off_secs = args.cut_off_secs.unwrap_or(config.extract.cut_off_secs);

    let step = duration_from_millis(step_ms)?;
    let chunks = range.split(duration_from_secs(cut_off_secs)?)?;

    println!(
        "{}: {} chunk(s), step {} ms, cut-off {} s",
        range,
        chunks.len(),
        step_ms,
        cut_off_secs
    );

    let mut total = 0;
    for chunk in &chunks {
        let increments = chunk.range.increment_count(step)?;
        total += increments;
        println!(
            "  #{:<3} {}  {} increment(s)",
            chunk.index, chunk.range, increments
        );
    }

    println!(
        "{} quer{} in total, up to {} records each",
        total,
        if total == 1 { "y" } else { "ies" },
        config.extract.limit
    );
    Ok(())
}
