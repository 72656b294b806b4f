use crate::types::LogLevel;
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

const CRATES: &[&str] = &["beatdump", "beatdump_fetch", "beatdump_runtime"];

fn directives(level: LogLevel) -> String {
    let mut parts = vec!["warn".to_string()];
    parts.extend(CRATES.iter().map(|krate| format!("{}={}", krate, level)));
    parts.join(",")
}

/// Log to stderr at `level` for our crates; RUST_LOG replaces this when set
pub fn init(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
