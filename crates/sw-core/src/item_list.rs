//! Item list parsing.
//!
//! The item list (`migrate.txt` by default) declares the migration steps in
//! execution order, one identifier per line.

use crate::error::{CoreError, CoreResult};
use crate::item::{ItemName, SchemaItem};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Parse item list text into ordered, duplicate-free items.
///
/// A blank line fails with its 1-based position, except a single blank line
/// that is the very last line of the text.
pub fn parse_item_list(content: &str) -> CoreResult<Vec<SchemaItem>> {
    let lines: Vec<&str> = content.lines().collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(lines.len());
    let mut items = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let position = idx + 1;
        let Some(name) = ItemName::try_new(*line) else {
            if position == lines.len() {
                break;
            }
            return Err(CoreError::EmptyRecord { position });
        };
        if !seen.insert(*line) {
            return Err(CoreError::DuplicateItem {
                identifier: line.to_string(),
            });
        }
        items.push(SchemaItem::new(name, position));
    }

    Ok(items)
}

/// Read and parse the item list at `path`.
///
/// A missing list is not an error: the parent directories and an empty list
/// file are created and an empty sequence is returned.
pub fn load_item_list(path: &Path) -> CoreResult<Vec<SchemaItem>> {
    match fs::read_to_string(path) {
        Ok(content) => parse_item_list(&content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
            }
            fs::File::create(path).map_err(|e| CoreError::io(path, e))?;
            log::info!("Created empty item list at {}", path.display());
            Ok(Vec::new())
        }
        Err(e) => Err(CoreError::io(path, e)),
    }
}

#[cfg(test)]
#[path = "item_list_test.rs"]
mod tests;
