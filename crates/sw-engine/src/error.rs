//! Error types for the migration engine.

use sw_core::CoreError;
use sw_db::DbError;
use thiserror::Error;

/// Boxed error returned by procedures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Migration engine errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Item list or configuration error (blank line, duplicate item, IO)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Two SQL resources share a name (MG001).
    #[error("[MG001] Resource name '{name}' is duplicated")]
    DuplicateResourceName { name: String },

    /// Two registered procedures share a name (MG002).
    #[error("[MG002] Procedure name '{name}' is duplicated")]
    DuplicateProcedureName { name: String },

    /// A name is both a SQL resource and a procedure (MG003).
    #[error("[MG003] '{name}' is both a resource and a procedure")]
    NameCollision { name: String },

    /// SQL item without a matching resource (MG004).
    #[error("[MG004] SQL resource '{identifier}' does not exist")]
    UnknownResource { identifier: String },

    /// Procedure item without a matching registered procedure (MG005).
    #[error("[MG005] Procedure '{identifier}' does not exist")]
    UnknownProcedure { identifier: String },

    /// Procedure item bound to something that is not a step (MG006).
    #[error(
        "[MG006] Procedure '{identifier}' has signature `{found}`, expected `fn(RunContext) -> Result<(), BoxError>`"
    )]
    BadProcedureSignature { identifier: String, found: String },

    /// Item whose suffix no handler understands (MG007).
    #[error("[MG007] Item '{identifier}' has unsupported type '{suffix}'")]
    UnsupportedKind { identifier: String, suffix: String },

    /// Stored state is dirty; an operator must intervene (MG008).
    #[error("[MG008] Found dirty migration state at version {version}")]
    DirtyState { version: usize },

    /// Stored version points past the end of the item list (MG009).
    #[error("[MG009] Stored version {version} is larger than the {items} declared items")]
    VersionOverflow { version: usize, items: usize },

    /// A SQL step failed and was rolled back (MG010).
    #[error("[MG010] SQL step {index} failed: {source}")]
    SqlStep {
        index: usize,
        #[source]
        source: DbError,
    },

    /// A procedure step returned an error (MG011).
    #[error("[MG011] Procedure step {index} failed: {source}")]
    ProcedureStep {
        index: usize,
        #[source]
        source: BoxError,
    },

    /// The state record could not be created or read (MG012).
    #[error("[MG012] Failed to read migration state from '{table}': {source}")]
    StateRead {
        table: String,
        #[source]
        source: DbError,
    },

    /// A step succeeded but its version was not recorded (MG013).
    #[error("[MG013] Step {index} was applied but its version could not be recorded: {source}")]
    StateNotRecorded {
        index: usize,
        #[source]
        source: DbError,
    },

    /// A step failed and the dirty flag could not be recorded either (MG014).
    #[error(
        "[MG014] Step {index} failed ({cause}) and the dirty flag could not be recorded: {source}"
    )]
    DirtyNotRecorded {
        index: usize,
        cause: Box<MigrateError>,
        #[source]
        source: DbError,
    },
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

/// Coarse classification of a [`MigrateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed declarations; nothing was read or written
    Declaration,
    /// An item could not be bound to a handler
    Resolution,
    /// Stored state does not allow progress
    StateConsistency,
    /// A step failed; state is marked dirty at its ordinal
    Execution,
    /// The persisted record may no longer match the store
    StateStore,
    /// Configuration or filesystem access failed
    Environment,
}

impl MigrateError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MigrateError::Core(CoreError::EmptyRecord { .. })
            | MigrateError::Core(CoreError::DuplicateItem { .. })
            | MigrateError::DuplicateResourceName { .. }
            | MigrateError::DuplicateProcedureName { .. }
            | MigrateError::NameCollision { .. } => ErrorCategory::Declaration,
            MigrateError::Core(_) => ErrorCategory::Environment,
            MigrateError::UnknownResource { .. }
            | MigrateError::UnknownProcedure { .. }
            | MigrateError::BadProcedureSignature { .. }
            | MigrateError::UnsupportedKind { .. } => ErrorCategory::Resolution,
            MigrateError::DirtyState { .. } | MigrateError::VersionOverflow { .. } => {
                ErrorCategory::StateConsistency
            }
            MigrateError::SqlStep { .. } | MigrateError::ProcedureStep { .. } => {
                ErrorCategory::Execution
            }
            MigrateError::StateRead { .. }
            | MigrateError::StateNotRecorded { .. }
            | MigrateError::DirtyNotRecorded { .. } => ErrorCategory::StateStore,
        }
    }

    /// Ordinal of the step this error is attributed to, if any.
    pub fn step_index(&self) -> Option<usize> {
        match self {
            MigrateError::SqlStep { index, .. }
            | MigrateError::ProcedureStep { index, .. }
            | MigrateError::StateNotRecorded { index, .. }
            | MigrateError::DirtyNotRecorded { index, .. } => Some(*index),
            _ => None,
        }
    }
}
