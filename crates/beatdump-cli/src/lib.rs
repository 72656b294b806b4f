// beatdump CLI
//
// Argument parsing, logging setup and terminal output. Everything that talks
// to the backend or the filesystem lives in beatdump-runtime.

mod args;
mod commands;
mod handlers;
mod logging;
mod progress;
pub mod types;

pub use args::{Cli, Commands, ConfigCommand};
pub use commands::run;
