use clap::ValueEnum;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

impl From<OutputFormat> for beatdump_runtime::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => beatdump_runtime::OutputFormat::Text,
            OutputFormat::Csv => beatdump_runtime::OutputFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum WindowPolicy {
    /// Every query starts at the chunk start
    Cumulative,
    /// Each query starts where the previous one ended
    Sliding,
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowPolicy::Cumulative => write!(f, "cumulative"),
            WindowPolicy::Sliding => write!(f, "sliding"),
        }
    }
}

impl From<WindowPolicy> for beatdump_fetch::WindowPolicy {
    fn from(policy: WindowPolicy) -> Self {
        match policy {
            WindowPolicy::Cumulative => beatdump_fetch::WindowPolicy::Cumulative,
            WindowPolicy::Sliding => beatdump_fetch::WindowPolicy::Sliding,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ChunkErrorPolicy {
    /// Stop at the first chunk that cannot be written
    Abort,
    /// Report the failed chunk and keep going
    Continue,
}

impl fmt::Display for ChunkErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkErrorPolicy::Abort => write!(f, "abort"),
            ChunkErrorPolicy::Continue => write!(f, "continue"),
        }
    }
}

impl From<ChunkErrorPolicy> for beatdump_runtime::ChunkFailurePolicy {
    fn from(policy: ChunkErrorPolicy) -> Self {
        match policy {
            ChunkErrorPolicy::Abort => beatdump_runtime::ChunkFailurePolicy::Abort,
            ChunkErrorPolicy::Continue => beatdump_runtime::ChunkFailurePolicy::Continue,
        }
    }
}
