use super::args::{Cli, Commands, ConfigCommand};
use super::handlers;
use crate::logging;
use anyhow::{Context, Result};
use beatdump_runtime::{Config, resolve_config_path};
use std::path::Path;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let config_path = resolve_config_path(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract(args) => {
            let config = load_config(&config_path)?;
            handlers::extract::handle(config, args, cli.quiet)
        }

        Commands::Plan(args) => {
            let config = load_config(&config_path)?;
            handlers::plan::handle(&config, args)
        }

        Commands::Config { command } => match command {
            ConfigCommand::Init { path, force } => {
                let path = path.unwrap_or(config_path);
                handlers::config::init(&path, force)
            }
            ConfigCommand::Show => {
                let config = load_config(&config_path)?;
                handlers::config::show(&config, &config_path)
            }
        },
    }
}

fn load_config(path: &Path) -> Result<Config> {
    let mut config = Config::load_from(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    config.apply_env();
    Ok(config)
}
