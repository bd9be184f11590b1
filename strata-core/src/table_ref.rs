use crate::{ColumnRef, Error, Expr, Result, Table};

/// A table bound to an alias for the scope of one query. An empty alias
/// means the table name itself is the qualifier.
#[derive(Debug, Clone)]
pub struct TableRef {
    pub table: Table,
    pub alias: String,
}

impl TableRef {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            alias: String::new(),
        }
    }

    pub fn aliased(table: &Table, alias: impl Into<String>) -> Self {
        Self {
            table: table.clone(),
            alias: alias.into(),
        }
    }

    /// The name this table is addressed by inside the query.
    pub fn qualifier(&self) -> &str {
        if self.alias.is_empty() {
            &self.table.name
        } else {
            &self.alias
        }
    }

    /// Qualified, typed column expression. Fails with
    /// [`Error::UnknownColumn`] when the table has no such column.
    pub fn col(&self, name: &str) -> Result<Expr> {
        let column = self
            .table
            .column(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_owned()))?;
        Ok(Expr::Column(
            ColumnRef::new(self.qualifier(), name),
            column.ty,
        ))
    }
}
