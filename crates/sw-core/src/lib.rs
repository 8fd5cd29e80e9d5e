//! sw-core - Core library for Stepwise
//!
//! This crate provides the migration item types, the item list parser
//! (`migrate.txt`), and the engine configuration (`stepwise.yml`) shared by
//! the engine and the CLI.

pub mod config;
pub mod error;
pub mod item;
pub mod item_list;

pub use config::{DatabaseConfig, MigrateConfig};
pub use error::{CoreError, CoreResult};
pub use item::{ItemKind, ItemName, SchemaItem, SQL_SUFFIX};
pub use item_list::{load_item_list, parse_item_list};
