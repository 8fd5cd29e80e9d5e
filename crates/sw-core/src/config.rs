//! Configuration types and parsing for stepwise.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default directory holding SQL resources and the item list
pub const DEFAULT_MIGRATIONS_DIR: &str = "./migrations";

/// Default item list file name, relative to the migrations directory
pub const DEFAULT_ITEM_LIST: &str = "migrate.txt";

/// Default table recording `{version, dirty}`
pub const DEFAULT_STATE_TABLE: &str = "schema_migrations";

const DEFAULT_DB_PATH: &str = "stepwise.duckdb";

const CONFIG_FILE_NAMES: &[&str] = &["stepwise.yml", "stepwise.yaml"];

/// Engine configuration from stepwise.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrateConfig {
    /// Directory containing SQL resources and the item list
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: PathBuf,

    /// Item list file name inside `migrations_dir`
    #[serde(default = "default_item_list")]
    pub item_list: String,

    /// Table holding the migration record
    #[serde(default = "default_state_table")]
    pub state_table: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Values handed to procedures through the run context
    #[serde(default)]
    pub vars: HashMap<String, serde_yaml::Value>,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            migrations_dir: default_migrations_dir(),
            item_list: default_item_list(),
            state_table: default_state_table(),
            database: DatabaseConfig::default(),
            vars: HashMap::new(),
        }
    }
}

fn default_migrations_dir() -> PathBuf {
    PathBuf::from(DEFAULT_MIGRATIONS_DIR)
}

fn default_item_list() -> String {
    DEFAULT_ITEM_LIST.to_string()
}

fn default_state_table() -> String {
    DEFAULT_STATE_TABLE.to_string()
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

impl MigrateConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let config: MigrateConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    ///
    /// Looks for stepwise.yml or stepwise.yaml and falls back to the defaults
    /// when neither exists. Relative paths are resolved against `dir`.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let found = CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists());

        let mut config = match found {
            Some(path) => Self::load(&path)?,
            None => {
                log::debug!("No stepwise.yml in {}, using defaults", dir.display());
                Self::default()
            }
        };
        config.resolve_relative_to(dir);
        Ok(config)
    }

    /// Anchor relative paths at `root`.
    pub fn resolve_relative_to(&mut self, root: &Path) {
        if self.migrations_dir.is_relative() {
            self.migrations_dir = root.join(&self.migrations_dir);
        }
        if self.database.path != ":memory:" && Path::new(&self.database.path).is_relative() {
            self.database.path = root.join(&self.database.path).display().to_string();
        }
    }

    /// Full path of the item list file
    pub fn item_list_path(&self) -> PathBuf {
        self.migrations_dir.join(&self.item_list)
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.item_list.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "item_list cannot be empty".to_string(),
            });
        }
        if !is_valid_table_name(&self.state_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "state_table '{}' must be a plain SQL identifier",
                    self.state_table
                ),
            });
        }
        Ok(())
    }
}

/// Check that `name` is safe to interpolate as a (schema-qualified) table name.
///
/// Accepts dot-separated segments of `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
