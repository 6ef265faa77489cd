//! Config Command
//!
//! Manage Adventure configuration.
//!
//! Usage:
//!   adventure config show [-f json]
//!   adventure config path
//!   adventure config init [-g] [--force]

use crate::cli::Output;
use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Show the effective configuration (credentials are never printed)
pub fn show(config: &Config, format: &str) -> Result<()> {
    let rendered = ConfigLoader::render_config(config, format == "json")?;
    println!("{}", rendered);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize global or project configuration
pub fn init(global: bool, force: bool) -> Result<()> {
    let (scope, config_path) = if global {
        ("global", ConfigLoader::init_global(force)?)
    } else {
        ("project", ConfigLoader::init_project(force)?)
    };

    let output = Output::new();
    output.success(&format!("Initialized {} configuration", scope));
    output.field("config", config_path.to_str());
    Ok(())
}
