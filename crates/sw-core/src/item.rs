//! Declared migration items.
//!
//! A [`SchemaItem`] is one line of the item list. Its [`ItemKind`] is derived
//! from the identifier's suffix and never changes after parsing.

use std::fmt;

/// Suffix marking an item as a SQL resource.
pub const SQL_SUFFIX: &str = ".sql";

/// Non-empty identifier of a declared item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemName(String);

impl ItemName {
    /// Try to create a name, returning `None` if it is empty.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for ItemName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for ItemName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// What kind of step an item refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// A SQL resource with the same name in the migrations directory
    Sql,
    /// A registered procedure (identifier has no suffix)
    Procedure,
    /// Any other suffix; rejected at resolution time
    Unsupported(String),
}

impl ItemKind {
    /// Derive the kind from the suffix of the last path segment.
    ///
    /// The suffix starts at the final `.` of the final `/`-separated segment,
    /// so `1_create.sql` is SQL, `Seed` is a procedure and `2.mongodb` is
    /// unsupported.
    pub fn from_identifier(identifier: &str) -> Self {
        let segment = identifier.rsplit('/').next().unwrap_or(identifier);
        match segment.rfind('.') {
            None => ItemKind::Procedure,
            Some(pos) => {
                let suffix = &segment[pos..];
                if suffix == SQL_SUFFIX {
                    ItemKind::Sql
                } else {
                    ItemKind::Unsupported(suffix.to_string())
                }
            }
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Sql => write!(f, "sql"),
            ItemKind::Procedure => write!(f, "procedure"),
            ItemKind::Unsupported(suffix) => write!(f, "unsupported({suffix})"),
        }
    }
}

/// One declared migration step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaItem {
    name: ItemName,
    kind: ItemKind,
    ordinal: usize,
}

impl SchemaItem {
    /// Create an item at the given 1-based position.
    pub fn new(name: ItemName, ordinal: usize) -> Self {
        let kind = ItemKind::from_identifier(name.as_str());
        Self {
            name,
            kind,
            ordinal,
        }
    }

    pub fn name(&self) -> &ItemName {
        &self.name
    }

    pub fn identifier(&self) -> &str {
        self.name.as_str()
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// 1-based position in the item list.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

#[cfg(test)]
#[path = "item_test.rs"]
mod tests;
