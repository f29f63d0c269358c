use anyhow::{Context, Result};
use content_hub_core::load_hub_config;
use content_hub_generator::xml::render_robots;
use std::path::PathBuf;

/// Print robots.txt; needs no backend
pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_hub_config(config_path.as_deref()).context("Failed to load configuration")?;
    print!("{}", render_robots(&config.site_url));
    Ok(())
}
