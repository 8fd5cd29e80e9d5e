//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use sw_core::MigrateConfig;
use sw_db::{Database, DuckDbBackend};
use sw_engine::Migrator;

use crate::cli::GlobalArgs;

/// Load the project configuration, applying global overrides.
///
/// `--config` replaces the lookup of `stepwise.yml` in the project
/// directory; relative paths inside it still resolve against the project
/// directory.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<MigrateConfig> {
    let root = Path::new(&global.project_dir);
    let mut config = match &global.config {
        Some(path) => {
            let mut config = MigrateConfig::load(Path::new(path))
                .with_context(|| format!("Failed to load config from {path}"))?;
            config.resolve_relative_to(root);
            config
        }
        None => MigrateConfig::load_from_dir(root).context("Failed to load project config")?,
    };

    if let Some(database) = &global.database {
        config.database.path = database.clone();
    }
    Ok(config)
}

/// Open the target database named by the configuration.
pub(crate) fn open_database(config: &MigrateConfig) -> Result<Arc<dyn Database>> {
    let db = DuckDbBackend::new(&config.database.path)
        .with_context(|| format!("Failed to open database: {}", config.database.path))?;
    Ok(Arc::new(db))
}

/// Load config, open the database and build the engine.
pub(crate) fn build_migrator(global: &GlobalArgs) -> Result<(MigrateConfig, Migrator)> {
    let config = load_config(global)?;
    let db = open_database(&config)?;
    log::debug!(
        "Using {} database at {}",
        db.db_type(),
        config.database.path
    );
    let migrator = Migrator::from_config(db, &config).context("Invalid configuration")?;
    Ok((config, migrator))
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
