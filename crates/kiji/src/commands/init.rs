//! Create a starter site.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kiji_publish::{scaffold, SlugPolicy};

use crate::config::{ConfigFile, DEFAULT_CONFIG};

/// Run the init command.
pub async fn run(
    config: &ConfigFile,
    config_path: &Path,
    root: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let publisher = config.publisher(root, SlugPolicy::default());
    tracing::info!("Initializing site in {}...", publisher.root.display());

    scaffold::init_site(&publisher, force).context("Failed to create site files")?;
    write_config(config_path, force)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'kiji new' to write an article or 'kiji serve' to use the form.");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        tracing::warn!("{} already exists. Use --force to overwrite.", path.display());
        return Ok(());
    }

    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}
