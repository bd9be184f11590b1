use crate::{ColumnType, Expr};
use std::fmt::{self, Display, Formatter};

/// Declarative specification of a table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Unqualified column expression, resolved against the owning table.
    /// Used inside CHECK constraints, where no table alias exists yet.
    pub fn expr(&self) -> Expr {
        Expr::Column(ColumnRef::unqualified(&self.name), self.ty)
    }
}

/// A `(qualifier, column)` pair as it appears inside an expression. The
/// qualifier is the table alias or table name visible in the query scope,
/// empty for unqualified references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub qualifier: String,
    pub name: String,
}

impl ColumnRef {
    pub fn new(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: qualifier.into(),
            name: name.into(),
        }
    }

    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            qualifier: String::new(),
            name: name.into(),
        }
    }
}

impl Display for ColumnRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.qualifier.is_empty() {
            write!(f, "{}.", self.qualifier)?;
        }
        f.write_str(&self.name)
    }
}
