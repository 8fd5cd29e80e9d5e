//! sw-engine - Migration engine for Stepwise
//!
//! Applies the steps declared in the item list to a target [`Database`]
//! exactly once, in declared order, recording progress as a single
//! `{version, dirty}` row so an interrupted run resumes where it stopped.
//!
//! [`Database`]: sw_db::Database

pub mod context;
pub mod error;
pub mod handler;
pub mod migrator;
pub mod procedure;
pub(crate) mod resolver;
pub mod resource;
pub mod state;

pub use context::RunContext;
pub use error::{BoxError, ErrorCategory, MigrateError, MigrateResult};
pub use handler::{Handler, ProcedureHandler, SqlHandler};
pub use migrator::{Migrator, RunReport, Status};
pub use procedure::{Binding, Export, ProcedureSet, ProcedureSource, StepFn};
pub use resource::{DirectorySource, ResourceSource, StaticSource};
pub use state::{MigrationRecord, MigrationStateStore};
