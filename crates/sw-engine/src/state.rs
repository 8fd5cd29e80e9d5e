//! Persistent migration state.
//!
//! A single `{version, dirty}` row in the state table (`schema_migrations`
//! by default) records how many items have been applied and whether the
//! item after them failed part-way.

use std::sync::Arc;
use sw_db::{Database, DbError, DbResult};

/// The persisted migration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MigrationRecord {
    /// Count of fully applied steps
    pub version: usize,
    /// The step at `version` (when dirty) started but did not succeed
    pub dirty: bool,
}

/// Reads and writes the migration record of one state table.
pub struct MigrationStateStore {
    db: Arc<dyn Database>,
    table: String,
}

impl MigrationStateStore {
    /// `table` must already be validated as a plain identifier.
    pub fn new(db: Arc<dyn Database>, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the state table (and its schema, if qualified) when missing.
    pub async fn ensure_initialized(&self) -> DbResult<()> {
        if let Some((schema, _)) = self.table.rsplit_once('.') {
            self.db
                .execute_batch(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"))
                .await?;
        }
        self.db
            .execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                     version INTEGER NOT NULL DEFAULT 0,
                     dirty   BOOLEAN NOT NULL DEFAULT false
                 )",
                self.table
            ))
            .await
    }

    /// Return the record, inserting the default `{0, false}` row if absent.
    pub async fn read(&self) -> DbResult<MigrationRecord> {
        self.ensure_initialized().await?;
        self.db
            .execute(&format!(
                "INSERT INTO {t} (version, dirty) SELECT 0, false \
                 WHERE NOT EXISTS (SELECT 1 FROM {t})",
                t = self.table
            ))
            .await?;
        Ok(self.select().await?.unwrap_or_default())
    }

    /// Return the record without creating the table or the row.
    pub async fn peek(&self) -> DbResult<Option<MigrationRecord>> {
        if !self.db.relation_exists(&self.table).await? {
            return Ok(None);
        }
        self.select().await
    }

    /// Record that the step `index` succeeded.
    pub async fn mark_applied(&self, index: usize) -> DbResult<()> {
        self.db
            .execute(&format!("UPDATE {} SET version = {index}", self.table))
            .await?;
        Ok(())
    }

    /// Record that the step `index` failed.
    pub async fn mark_dirty(&self, index: usize) -> DbResult<()> {
        self.db
            .execute(&format!(
                "UPDATE {} SET version = {index}, dirty = true",
                self.table
            ))
            .await?;
        Ok(())
    }

    async fn select(&self) -> DbResult<Option<MigrationRecord>> {
        let row = self
            .db
            .query_int_row(
                &format!(
                    "SELECT CAST(version AS BIGINT), CAST(dirty AS BIGINT) FROM {} LIMIT 1",
                    self.table
                ),
                2,
            )
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let version = usize::try_from(row[0]).map_err(|_| {
            DbError::ExecutionError(format!(
                "{} holds a negative version: {}",
                self.table, row[0]
            ))
        })?;
        Ok(Some(MigrationRecord {
            version,
            dirty: row[1] != 0,
        }))
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
