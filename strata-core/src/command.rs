use crate::{AsValue, Result, Row, Table, validator};

/// A validated DDL/DML command. Constructors run the validator, so an
/// existing `Command` is always renderable.
#[derive(Debug, Clone)]
pub enum Command {
    CreateTable {
        table: Table,
        if_not_exists: bool,
    },
    DropTable {
        table: Table,
        if_exists: bool,
    },
    /// The column subset order is the parameter binding order.
    Insert {
        table: Table,
        columns: Vec<String>,
        values: Row,
    },
}

impl Command {
    pub fn create_table(table: &Table) -> Result<Command> {
        Self::create_table_full(table, false)
    }

    pub fn create_table_if_not_exists(table: &Table) -> Result<Command> {
        Self::create_table_full(table, true)
    }

    fn create_table_full(table: &Table, if_not_exists: bool) -> Result<Command> {
        let command = Command::CreateTable {
            table: table.clone(),
            if_not_exists,
        };
        validator::validate_command(&command)?;
        Ok(command)
    }

    pub fn drop_table(table: &Table, if_exists: bool) -> Command {
        // Nothing to resolve: the table handle is the schema.
        Command::DropTable {
            table: table.clone(),
            if_exists,
        }
    }

    /// INSERT one row into an explicit column subset.
    pub fn insert<S: Into<String>>(
        table: &Table,
        columns: impl IntoIterator<Item = S>,
        values: impl IntoIterator<Item = crate::Value>,
    ) -> Result<Command> {
        let command = Command::Insert {
            table: table.clone(),
            columns: columns.into_iter().map(Into::into).collect(),
            values: values.into_iter().collect::<Vec<_>>().into_boxed_slice(),
        };
        validator::validate_command(&command)?;
        Ok(command)
    }

    /// Convenience over [`Command::insert`] for typed values.
    pub fn insert_values<S: Into<String>, V: AsValue>(
        table: &Table,
        columns: impl IntoIterator<Item = S>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Command> {
        let values = values
            .into_iter()
            .map(AsValue::as_value)
            .collect::<Result<Vec<_>>>()?;
        Self::insert(table, columns, values)
    }
}
