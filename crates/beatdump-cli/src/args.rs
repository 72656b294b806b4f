use crate::types::{ChunkErrorPolicy, LogLevel, OutputFormat, WindowPolicy};
use beatdump_types::TimeRange;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "beatdump")]
#[command(
    about = "Extract metrics, logs and traces from a metricbeat search backend into files",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Config file (default: $BEATDUMP_CONFIG, then ./beatdump.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, default_value = "info", global = true)]
    pub log_level: LogLevel,

    /// Hide progress and the run summary
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch records for one or more ranges and write them to files
    Extract(ExtractArgs),

    /// Show the chunks and query increments a range would use, without fetching
    Plan(PlanArgs),

    /// Create or inspect the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Range start, e.g. 2024-12-14T00:00:00.000Z
    #[arg(long, requires = "end", required_unless_present = "range")]
    pub start: Option<String>,

    /// Range end (exclusive)
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Additional range as START,END; may be repeated
    #[arg(long = "range", value_name = "START,END", value_parser = parse_range)]
    pub range: Vec<TimeRange>,

    #[arg(long)]
    pub step_ms: Option<u64>,

    /// Page size of every query
    #[arg(long)]
    pub limit: Option<u64>,

    #[arg(long)]
    pub cut_off_secs: Option<u64>,

    #[arg(long)]
    pub window: Option<WindowPolicy>,

    #[arg(long)]
    pub on_chunk_error: Option<ChunkErrorPolicy>,

    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Parent of the per-range output directories
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Search endpoint, e.g. https://host:5200/metricbeat-*/_search
    #[arg(long)]
    pub url: Option<String>,

    /// query_string term every record must match
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct PlanArgs {
    #[arg(long)]
    pub start: String,

    #[arg(long)]
    pub end: String,

    #[arg(long)]
    pub step_ms: Option<u64>,

    #[arg(long)]
    pub cut_off_secs: Option<u64>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Where to write (default: the resolved config path)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration with the API key masked
    Show,
}

fn parse_range(value: &str) -> Result<TimeRange, String> {
    let (start, end) = value
        .split_once(',')
        .ok_or_else(|| format!("expected START,END, got '{}'", value))?;
    TimeRange::parse(start, end).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_range_pair() {
        let range = parse_range("2024-12-14T00:00:00.000Z,2024-12-15T00:00:00.000Z").unwrap();
        assert_eq!(range.duration().num_hours(), 24);
    }

    #[test]
    fn test_parse_range_rejects_missing_comma() {
        assert!(parse_range("2024-12-14T00:00:00.000Z").is_err());
    }

    #[test]
    fn test_parse_range_rejects_reversed_bounds() {
        let err = parse_range("2024-12-15T00:00:00.000Z,2024-12-14T00:00:00.000Z").unwrap_err();
        assert!(err.contains("after"));
    }

    #[test]
    fn test_extract_accepts_ranges_without_start() {
        let cli = Cli::try_parse_from([
            "beatdump",
            "extract",
            "--range",
            "2024-12-14T00:00:00Z,2024-12-14T01:00:00Z",
            "--range",
            "2024-12-15T00:00:00Z,2024-12-15T01:00:00Z",
        ])
        .unwrap();
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.range.len(), 2);
        assert!(args.start.is_none());
    }

    #[test]
    fn test_extract_requires_some_range() {
        assert!(Cli::try_parse_from(["beatdump", "extract"]).is_err());
        assert!(
            Cli::try_parse_from(["beatdump", "extract", "--start", "2024-12-14T00:00:00Z"])
                .is_err()
        );
    }
}
