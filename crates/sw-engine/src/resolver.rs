//! Binds declared items to executable handlers.

use crate::error::{MigrateError, MigrateResult};
use crate::handler::{Handler, ProcedureHandler, SqlHandler};
use crate::procedure::{collect_bindings, Binding, ProcedureSource};
use crate::resource::ResourceSource;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use sw_core::{ItemKind, SchemaItem};
use sw_db::Database;

/// Validated view of the available resources and procedures.
pub(crate) struct Resolver<'a> {
    db: Arc<dyn Database>,
    resources: &'a dyn ResourceSource,
    resource_names: HashSet<String>,
    procedures: HashMap<String, Binding>,
}

impl<'a> Resolver<'a> {
    /// Collect names from both namespaces and reject duplicates and collisions.
    pub(crate) fn new(
        db: Arc<dyn Database>,
        resources: &'a dyn ResourceSource,
        sources: &[Arc<dyn ProcedureSource>],
    ) -> MigrateResult<Self> {
        let procedures = collect_bindings(sources)?;

        let names = resources.names()?;
        let mut resource_names = HashSet::with_capacity(names.len());
        for name in &names {
            if !resource_names.insert(name.clone()) {
                return Err(MigrateError::DuplicateResourceName { name: name.clone() });
            }
        }

        if let Some(name) = names.iter().find(|name| procedures.contains_key(*name)) {
            return Err(MigrateError::NameCollision { name: name.clone() });
        }

        Ok(Self {
            db,
            resources,
            resource_names,
            procedures,
        })
    }

    /// Build the handler chain for `items`, preserving their order.
    pub(crate) fn resolve(&self, items: &[SchemaItem]) -> MigrateResult<Vec<Box<dyn Handler>>> {
        items.iter().map(|item| self.resolve_item(item)).collect()
    }

    fn resolve_item(&self, item: &SchemaItem) -> MigrateResult<Box<dyn Handler>> {
        let identifier = item.identifier();
        match item.kind() {
            ItemKind::Sql => {
                if !self.resource_names.contains(identifier) {
                    return Err(MigrateError::UnknownResource {
                        identifier: identifier.to_string(),
                    });
                }
                let sql = self.resources.load(identifier)?;
                Ok(Box::new(SqlHandler::new(
                    self.db.clone(),
                    item.ordinal(),
                    sql,
                )))
            }
            ItemKind::Procedure => match self.procedures.get(identifier) {
                None => Err(MigrateError::UnknownProcedure {
                    identifier: identifier.to_string(),
                }),
                Some(Binding::Other { signature }) => Err(MigrateError::BadProcedureSignature {
                    identifier: identifier.to_string(),
                    found: signature.clone(),
                }),
                Some(Binding::Step(step)) => {
                    Ok(Box::new(ProcedureHandler::new(item.ordinal(), step.clone())))
                }
            },
            // New step types get their handler here
            ItemKind::Unsupported(suffix) => Err(MigrateError::UnsupportedKind {
                identifier: identifier.to_string(),
                suffix: suffix.clone(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
