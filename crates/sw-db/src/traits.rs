//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Target store the migration engine reads state from and applies steps to.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute one or more statements inside a single transaction.
    ///
    /// Commits on success; rolls back and returns the execution error
    /// otherwise.
    async fn execute_in_transaction(&self, sql: &str) -> DbResult<()>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Execute query returning row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Read the first `columns` columns of the first row as integers.
    ///
    /// Returns `None` when the query yields no rows.
    async fn query_int_row(&self, sql: &str, columns: usize) -> DbResult<Option<Vec<i64>>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
