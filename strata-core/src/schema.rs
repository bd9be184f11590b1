use crate::{ColumnDef, Error, Expr, Result};
use std::sync::Arc;

/// A declared table: name, ordered columns and table-level constraints.
/// Immutable once declared; shared between queries as [`Table`].
#[derive(Debug, Clone)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<Constraint>,
}

/// Shared handle to a declared table.
pub type Table = Arc<TableDef>;

impl TableDef {
    /// Declare a table. Fails with [`Error::DuplicateColumn`] when a column
    /// name repeats.
    pub fn new(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = ColumnDef>,
    ) -> Result<Self> {
        let name = name.into();
        let columns = columns.into_iter().collect::<Vec<_>>();
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(Error::DuplicateColumn {
                    table: name.clone(),
                    column: column.name.clone(),
                });
            }
        }
        Ok(Self {
            name,
            columns,
            constraints: Vec::new(),
        })
    }

    /// Attach a constraint, builder style. Constraints are checked against
    /// the column set when a CREATE TABLE command is constructed.
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Freeze the declaration into a shareable handle.
    pub fn shared(self) -> Table {
        Arc::new(self)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Table-level constraint, rendered inside CREATE TABLE. Column references
/// must resolve within the owning table; a foreign key additionally
/// resolves its target columns within the referenced table.
#[derive(Debug, Clone)]
pub enum Constraint {
    PrimaryKey(Vec<String>),
    /// The column must be the single INTEGER primary key.
    AutoIncrement(String),
    ForeignKey {
        table: Table,
        columns: Vec<String>,
        references: Vec<String>,
    },
    NotNull(String),
    Unique(Vec<String>),
    /// Structurally validated only; runtime semantics stay with the engine.
    Check(Expr),
}

impl Constraint {
    pub fn primary_key<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Constraint::PrimaryKey(columns.into_iter().map(Into::into).collect())
    }

    pub fn unique<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Constraint::Unique(columns.into_iter().map(Into::into).collect())
    }

    pub fn foreign_key<S: Into<String>>(
        table: &Table,
        columns: impl IntoIterator<Item = S>,
        references: impl IntoIterator<Item = S>,
    ) -> Self {
        Constraint::ForeignKey {
            table: table.clone(),
            columns: columns.into_iter().map(Into::into).collect(),
            references: references.into_iter().map(Into::into).collect(),
        }
    }
}
