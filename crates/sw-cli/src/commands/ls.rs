//! List command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use sw_engine::Status;

use crate::cli::{GlobalArgs, LsArgs, OutputFormat};
use crate::commands::common::build_migrator;

/// Where an item stands relative to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ItemState {
    Applied,
    Failed,
    Pending,
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemState::Applied => write!(f, "applied"),
            ItemState::Failed => write!(f, "failed"),
            ItemState::Pending => write!(f, "pending"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ItemRow {
    ordinal: usize,
    identifier: String,
    kind: String,
    state: ItemState,
}

/// State of the item at `ordinal` given the stored record.
pub(crate) fn item_state(status: &Status, ordinal: usize) -> ItemState {
    let version = status.version();
    if status.is_dirty() && ordinal == version {
        ItemState::Failed
    } else if ordinal <= version {
        ItemState::Applied
    } else {
        ItemState::Pending
    }
}

fn rows(status: &Status, pending_only: bool) -> Vec<ItemRow> {
    status
        .items
        .iter()
        .map(|item| ItemRow {
            ordinal: item.ordinal(),
            identifier: item.identifier().to_string(),
            kind: item.kind().to_string(),
            state: item_state(status, item.ordinal()),
        })
        .filter(|row| !pending_only || row.state != ItemState::Applied)
        .collect()
}

/// Execute the ls command
pub async fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let (_, migrator) = build_migrator(global)?;
    let status = migrator
        .status()
        .await
        .context("Failed to read migration status")?;
    let rows = rows(&status, args.pending);

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Table => print_table(&rows),
    }

    Ok(())
}

fn print_table(rows: &[ItemRow]) {
    if rows.is_empty() {
        println!("No items.");
        return;
    }

    let id_width = rows
        .iter()
        .map(|r| r.identifier.len())
        .max()
        .unwrap_or(0)
        .max("ITEM".len());

    println!("{:>4}  {:<id_width$}  {:<11}  STATE", "#", "ITEM", "KIND");
    for row in rows {
        println!(
            "{:>4}  {:<id_width$}  {:<11}  {}",
            row.ordinal, row.identifier, row.kind, row.state
        );
    }
}

#[cfg(test)]
#[path = "ls_test.rs"]
mod tests;
