use anyhow::{Result, bail};
use beatdump_runtime::Config;
use std::path::Path;

pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub fn show(config: &Config, path: &Path) -> Result<()> {
    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }
    print!("{}", config.redacted().to_toml()?);
    Ok(())
}
