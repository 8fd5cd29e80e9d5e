//! Status command implementation

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::build_migrator;

#[derive(Debug, Serialize)]
struct StatusOutput {
    state_table: String,
    initialized: bool,
    version: usize,
    dirty: bool,
    items: usize,
    pending: usize,
}

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let (config, migrator) = build_migrator(global)?;
    let status = migrator
        .status()
        .await
        .context("Failed to read migration status")?;

    let output = StatusOutput {
        state_table: config.state_table.clone(),
        initialized: status.record.is_some(),
        version: status.version(),
        dirty: status.is_dirty(),
        items: status.items.len(),
        pending: status.pending().len(),
    };

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            if !output.initialized {
                println!("State table {} does not exist yet", output.state_table);
            }
            println!("Version: {}", output.version);
            println!("Dirty:   {}", if output.dirty { "yes" } else { "no" });
            println!("Pending: {} of {} items", output.pending, output.items);
        }
    }

    Ok(())
}
