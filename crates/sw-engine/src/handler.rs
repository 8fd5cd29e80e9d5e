//! Executable migration steps.

use crate::context::RunContext;
use crate::error::{MigrateError, MigrateResult};
use crate::procedure::StepFn;
use async_trait::async_trait;
use std::sync::Arc;
use sw_db::Database;

/// One executable migration step bound to an item ordinal.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Ordinal recorded as the version once this step succeeds.
    fn index(&self) -> usize;

    /// Apply the step.
    async fn exec(&self, ctx: &RunContext) -> MigrateResult<()>;
}

/// Runs the statement text of a SQL resource inside one transaction.
pub struct SqlHandler {
    index: usize,
    sql: String,
    db: Arc<dyn Database>,
}

impl SqlHandler {
    pub fn new(db: Arc<dyn Database>, index: usize, sql: impl Into<String>) -> Self {
        Self {
            index,
            sql: sql.into(),
            db,
        }
    }
}

#[async_trait]
impl Handler for SqlHandler {
    fn index(&self) -> usize {
        self.index
    }

    async fn exec(&self, _ctx: &RunContext) -> MigrateResult<()> {
        // Empty resources are no-op steps
        if self.sql.trim().is_empty() {
            return Ok(());
        }
        self.db
            .execute_in_transaction(&self.sql)
            .await
            .map_err(|source| MigrateError::SqlStep {
                index: self.index,
                source,
            })
    }
}

/// Calls a registered procedure with the run context.
pub struct ProcedureHandler {
    index: usize,
    step: StepFn,
}

impl ProcedureHandler {
    pub fn new(index: usize, step: StepFn) -> Self {
        Self { index, step }
    }
}

#[async_trait]
impl Handler for ProcedureHandler {
    fn index(&self) -> usize {
        self.index
    }

    async fn exec(&self, ctx: &RunContext) -> MigrateResult<()> {
        (self.step)(ctx.clone())
            .await
            .map_err(|source| MigrateError::ProcedureStep {
                index: self.index,
                source,
            })
    }
}

#[cfg(test)]
#[path = "handler_test.rs"]
mod tests;
