//! Procedure registration.
//!
//! Callers register [`ProcedureSource`]s; each source exposes named
//! [`Export`]s. Item list identifiers without a suffix resolve against the
//! union of all exports by name.

use crate::context::RunContext;
use crate::error::{BoxError, MigrateError, MigrateResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A step-shaped procedure: takes the run context, returns success or an error.
pub type StepFn = Arc<dyn Fn(RunContext) -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

/// What an exported name is bound to.
#[derive(Clone)]
pub enum Binding {
    /// Callable as a migration step
    Step(StepFn),
    /// Any other member; resolving an item to it fails
    Other { signature: String },
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Step(_) => f.write_str("Step(..)"),
            Binding::Other { signature } => f.debug_struct("Other").field("signature", signature).finish(),
        }
    }
}

/// A named member of a procedure source.
#[derive(Debug, Clone)]
pub struct Export {
    pub name: String,
    pub binding: Binding,
}

impl Export {
    /// Export an async closure as a step.
    pub fn step<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(RunContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            binding: Binding::Step(Arc::new(move |ctx| f(ctx).boxed())),
        }
    }

    /// Export a member that is not callable as a step.
    pub fn other(name: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binding: Binding::Other {
                signature: signature.into(),
            },
        }
    }
}

/// Something that exposes procedures by name.
pub trait ProcedureSource: Send + Sync {
    fn exports(&self) -> Vec<Export>;
}

/// Ready-made [`ProcedureSource`] built from closures.
///
/// ```ignore
/// let seeds = ProcedureSet::new().step("Seed", |ctx| async move {
///     println!("age = {:?}", ctx.i64("age"));
///     Ok(())
/// });
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProcedureSet {
    exports: Vec<Export>,
}

impl ProcedureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step procedure.
    pub fn step<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(RunContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.exports.push(Export::step(name, f));
        self
    }

    /// Add a member that is visible by name but not callable as a step.
    pub fn member(mut self, name: impl Into<String>, signature: impl Into<String>) -> Self {
        self.exports.push(Export::other(name, signature));
        self
    }
}

impl ProcedureSource for ProcedureSet {
    fn exports(&self) -> Vec<Export> {
        self.exports.clone()
    }
}

/// Merge the exports of all sources into one name → binding map.
///
/// A name exported twice, within one source or across sources, fails with
/// [`MigrateError::DuplicateProcedureName`].
pub(crate) fn collect_bindings(
    sources: &[Arc<dyn ProcedureSource>],
) -> MigrateResult<HashMap<String, Binding>> {
    let mut bindings = HashMap::new();
    for source in sources {
        for export in source.exports() {
            if bindings.contains_key(&export.name) {
                return Err(MigrateError::DuplicateProcedureName { name: export.name });
            }
            bindings.insert(export.name, export.binding);
        }
    }
    Ok(bindings)
}

#[cfg(test)]
#[path = "procedure_test.rs"]
mod tests;
