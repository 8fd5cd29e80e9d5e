//! SQL resource sources.
//!
//! Items ending in `.sql` name a resource whose content is the statement
//! text of the step.

use crate::error::{MigrateError, MigrateResult};
use std::fs;
use std::path::{Path, PathBuf};
use sw_core::CoreError;

/// Provides the available SQL resource names and their contents.
pub trait ResourceSource: Send + Sync {
    /// All available resource names, in a stable order.
    fn names(&self) -> MigrateResult<Vec<String>>;

    /// Literal content of the resource `name`.
    fn load(&self, name: &str) -> MigrateResult<String>;
}

/// Resources are the files directly inside a directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ResourceSource for DirectorySource {
    fn names(&self) -> MigrateResult<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| CoreError::io(&self.dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::io(&self.dir, e))?;
            let file_type = entry.file_type().map_err(|e| CoreError::io(&entry.path(), e))?;
            if file_type.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => log::warn!("Skipping non UTF-8 file name {raw:?}"),
            }
        }
        names.sort();
        Ok(names)
    }

    fn load(&self, name: &str) -> MigrateResult<String> {
        let path = self.dir.join(name);
        fs::read_to_string(&path).map_err(|e| MigrateError::from(CoreError::io(&path, e)))
    }
}

/// In-memory resources, e.g. embedded with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    resources: Vec<(String, String)>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource named `name` with statement text `sql`.
    pub fn with(mut self, name: impl Into<String>, sql: impl Into<String>) -> Self {
        self.resources.push((name.into(), sql.into()));
        self
    }
}

impl ResourceSource for StaticSource {
    fn names(&self) -> MigrateResult<Vec<String>> {
        Ok(self.resources.iter().map(|(name, _)| name.clone()).collect())
    }

    fn load(&self, name: &str) -> MigrateResult<String> {
        self.resources
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, sql)| sql.clone())
            .ok_or_else(|| MigrateError::UnknownResource {
                identifier: name.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "resource_test.rs"]
mod tests;
