//! Config command handlers.

use anyhow::{Context, Result};
use inquiro_core::config;

pub fn path() {
    println!("{}", config::paths::config_path().display());
}

pub fn init() -> Result<()> {
    let config_path = config::paths::config_path();
    config::Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn generate() -> Result<()> {
    let toml = config::Config::generate()?;
    print!("{toml}");
    Ok(())
}

/// Opens the config file, creating it from the template first if missing.
pub fn edit() -> Result<()> {
    let config_path = config::paths::config_path();
    if !config_path.exists() {
        config::Config::init(&config_path)
            .with_context(|| format!("init config at {}", config_path.display()))?;
        println!("Created config at {}", config_path.display());
    }
    open::that(&config_path).with_context(|| format!("open {}", config_path.display()))?;
    Ok(())
}
