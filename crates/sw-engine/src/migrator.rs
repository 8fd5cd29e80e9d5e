//! Migration orchestrator.
//!
//! [`Migrator::run`] validates the declarations, reconciles the stored
//! record against the item list, and applies the unapplied items in order,
//! stopping at the first failure.

use crate::context::RunContext;
use crate::error::{MigrateError, MigrateResult};
use crate::handler::Handler;
use crate::procedure::ProcedureSource;
use crate::resolver::Resolver;
use crate::resource::{DirectorySource, ResourceSource};
use crate::state::{MigrationRecord, MigrationStateStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sw_core::config::{DEFAULT_ITEM_LIST, DEFAULT_MIGRATIONS_DIR, DEFAULT_STATE_TABLE};
use sw_core::{load_item_list, CoreError, MigrateConfig, SchemaItem};
use sw_db::Database;
use tokio::sync::Mutex;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Indices of the steps applied by this run, in execution order
    pub applied: Vec<usize>,
    /// Stored version after the run
    pub version: usize,
}

impl RunReport {
    /// True when nothing was left to apply.
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Stored record next to the declared items.
#[derive(Debug, Clone)]
pub struct Status {
    /// `None` when the state table has never been created
    pub record: Option<MigrationRecord>,
    pub items: Vec<SchemaItem>,
}

impl Status {
    pub fn version(&self) -> usize {
        self.record.map(|r| r.version).unwrap_or(0)
    }

    pub fn is_dirty(&self) -> bool {
        self.record.is_some_and(|r| r.dirty)
    }

    /// Items after the stored version.
    ///
    /// When the state is dirty the first of these is the failed step.
    pub fn pending(&self) -> &[SchemaItem] {
        let from = if self.is_dirty() {
            self.version().saturating_sub(1)
        } else {
            self.version()
        };
        &self.items[from.min(self.items.len())..]
    }
}

/// Registrations guarded for the duration of a run.
#[derive(Default)]
struct Registry {
    sources: Vec<Arc<dyn ProcedureSource>>,
    handlers: Vec<Box<dyn Handler>>,
}

/// Sequential migration engine for one target database.
pub struct Migrator {
    db: Arc<dyn Database>,
    migrations_dir: PathBuf,
    item_list: String,
    state_table: String,
    resources: Option<Arc<dyn ResourceSource>>,
    registry: Mutex<Registry>,
}

impl Migrator {
    /// Engine with the default directory, item list and state table.
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self {
            db,
            migrations_dir: PathBuf::from(DEFAULT_MIGRATIONS_DIR),
            item_list: DEFAULT_ITEM_LIST.to_string(),
            state_table: DEFAULT_STATE_TABLE.to_string(),
            resources: None,
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Engine configured from `stepwise.yml`.
    pub fn from_config(db: Arc<dyn Database>, config: &MigrateConfig) -> MigrateResult<Self> {
        config.validate()?;
        Ok(Self::new(db)
            .with_migrations_dir(&config.migrations_dir)
            .with_item_list(&config.item_list)
            .with_state_table(&config.state_table))
    }

    pub fn with_migrations_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.migrations_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_item_list(mut self, name: impl Into<String>) -> Self {
        self.item_list = name.into();
        self
    }

    /// Set the state table; checked when the engine runs.
    pub fn with_state_table(mut self, table: impl Into<String>) -> Self {
        self.state_table = table.into();
        self
    }

    /// Read SQL resources from `resources` instead of the migrations directory.
    pub fn with_resources(mut self, resources: Arc<dyn ResourceSource>) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn item_list_path(&self) -> PathBuf {
        self.migrations_dir.join(&self.item_list)
    }

    /// Queue pre-built handlers; they run ahead of the resolved items on
    /// the next run.
    pub async fn add_handlers(&self, handlers: impl IntoIterator<Item = Box<dyn Handler>>) {
        self.registry.lock().await.handlers.extend(handlers);
    }

    /// Register procedure sources for name resolution.
    pub async fn apply_objects(&self, sources: impl IntoIterator<Item = Arc<dyn ProcedureSource>>) {
        self.registry.lock().await.sources.extend(sources);
    }

    /// Apply every unapplied item, in order.
    ///
    /// Fails before touching the store on declaration errors, before any step
    /// runs on resolution or state errors, and at the first failing step
    /// otherwise, leaving the record dirty at that step's ordinal.
    pub async fn run(&self, ctx: &RunContext) -> MigrateResult<RunReport> {
        let mut registry = self.registry.lock().await;
        self.check_state_table()?;

        let items = load_item_list(&self.item_list_path())?;
        let resources = self.resource_source();
        let resolver = Resolver::new(self.db.clone(), resources.as_ref(), &registry.sources)?;

        let store = self.state_store();
        let record = store
            .read()
            .await
            .map_err(|source| MigrateError::StateRead {
                table: self.state_table.clone(),
                source,
            })?;
        if record.dirty {
            return Err(MigrateError::DirtyState {
                version: record.version,
            });
        }
        if record.version > items.len() {
            return Err(MigrateError::VersionOverflow {
                version: record.version,
                items: items.len(),
            });
        }

        let resolved = resolver.resolve(&items[record.version..])?;
        let mut chain = std::mem::take(&mut registry.handlers);
        chain.extend(resolved);

        let applied = execute_chain(&store, chain, ctx).await?;
        let version = applied.last().copied().unwrap_or(record.version);
        log::info!(
            "Applied {} migration step(s); version is now {}",
            applied.len(),
            version
        );
        Ok(RunReport { applied, version })
    }

    /// Read the stored record and the declared items without applying
    /// anything or creating the state table.
    pub async fn status(&self) -> MigrateResult<Status> {
        let _registry = self.registry.lock().await;
        self.check_state_table()?;

        let items = load_item_list(&self.item_list_path())?;
        let record = self
            .state_store()
            .peek()
            .await
            .map_err(|source| MigrateError::StateRead {
                table: self.state_table.clone(),
                source,
            })?;
        Ok(Status { record, items })
    }

    fn check_state_table(&self) -> MigrateResult<()> {
        if sw_core::config::is_valid_table_name(&self.state_table) {
            Ok(())
        } else {
            Err(CoreError::ConfigInvalid {
                message: format!(
                    "state_table '{}' must be a plain SQL identifier",
                    self.state_table
                ),
            }
            .into())
        }
    }

    fn resource_source(&self) -> Arc<dyn ResourceSource> {
        match &self.resources {
            Some(resources) => resources.clone(),
            None => Arc::new(DirectorySource::new(&self.migrations_dir)),
        }
    }

    fn state_store(&self) -> MigrationStateStore {
        MigrationStateStore::new(self.db.clone(), self.state_table.clone())
    }
}

/// Run `chain` in order, recording each outcome before the next step starts.
async fn execute_chain(
    store: &MigrationStateStore,
    chain: Vec<Box<dyn Handler>>,
    ctx: &RunContext,
) -> MigrateResult<Vec<usize>> {
    let mut applied = Vec::with_capacity(chain.len());
    for handler in chain {
        let index = handler.index();
        log::debug!("Applying migration step {index}");

        if let Err(err) = handler.exec(ctx).await {
            log::warn!("Migration step {index} failed, marking state dirty: {err}");
            if let Err(source) = store.mark_dirty(index).await {
                log::error!("Could not mark step {index} dirty in {}: {source}", store.table());
                return Err(MigrateError::DirtyNotRecorded {
                    index,
                    cause: Box::new(err),
                    source,
                });
            }
            return Err(err);
        }

        store
            .mark_applied(index)
            .await
            .map_err(|source| MigrateError::StateNotRecorded { index, source })?;
        applied.push(index);
    }
    Ok(applied)
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
