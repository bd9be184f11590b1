use crate::{
    Command, Connection, Driver, Prepared, Query, Record, Rendered, Result, RowLabeled, SqlWriter,
    Step,
};

/// Metadata about modify operations (INSERT/CREATE/DROP).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
    /// Backend-specific last inserted identifier when available.
    pub last_affected_id: Option<i64>,
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            self.rows_affected += elem.rows_affected;
            if elem.last_affected_id.is_some() {
                self.last_affected_id = elem.last_affected_id;
            }
        }
    }
}

/// Binds rendered queries and commands to a driver connection, pulls rows
/// and applies the row marshaller. Owns the only mutable access to the
/// connection, which serializes all execution against it.
pub struct Executor<'c, C: Connection> {
    connection: &'c mut C,
    writer: <C::Driver as Driver>::SqlWriter,
}

impl<'c, C: Connection> Executor<'c, C> {
    pub fn new(connection: &'c mut C) -> Self {
        let writer = connection.driver().sql_writer();
        Self { connection, writer }
    }

    /// Prepare, bind and drain one rendered statement.
    fn run(&mut self, rendered: &Rendered) -> Result<()> {
        log::debug!("executing {}", rendered);
        let mut statement = self.connection.prepare(&rendered.sql)?;
        for (index, value) in rendered.params.iter().enumerate() {
            statement.bind(index + 1, value)?;
        }
        while let Step::Row(..) = statement.step()? {}
        statement.finalize()
    }

    /// Execute a command, reporting the affected row count and, for
    /// inserts, the generated key when the backend exposes one.
    pub fn execute(&mut self, command: &Command) -> Result<RowsAffected> {
        let rendered = self.writer.render_command(command);
        self.run(&rendered)?;
        Ok(self.connection.rows_affected())
    }

    /// Fetch at most `limit` rows. Reaching the limit simply truncates the
    /// result, it is not an error; the statement is finalized either way.
    pub fn fetch(&mut self, query: &Query, limit: usize) -> Result<Vec<RowLabeled>> {
        let rendered = self.writer.render_query(query);
        log::debug!("fetching {}", rendered);
        let mut statement = self.connection.prepare(&rendered.sql)?;
        for (index, value) in rendered.params.iter().enumerate() {
            statement.bind(index + 1, value)?;
        }
        let mut rows = Vec::new();
        while rows.len() < limit {
            match statement.step()? {
                Step::Row(row) => rows.push(row),
                Step::Done => break,
            }
        }
        statement.finalize()?;
        Ok(rows)
    }

    /// Fetch and marshal each row into a typed record.
    pub fn fetch_as<R: Record>(&mut self, query: &Query, limit: usize) -> Result<Vec<R>> {
        self.fetch(query, limit)?
            .iter()
            .map(R::from_row)
            .collect()
    }

    /// Run all commands inside one transaction. The first failure rolls
    /// back every effect of the batch and is returned; nothing is retried.
    pub fn exec_in_transaction(&mut self, commands: &[Command]) -> Result<RowsAffected> {
        self.connection.begin()?;
        let mut total = RowsAffected::default();
        for command in commands {
            match self.execute(command) {
                Ok(affected) => total.extend([affected]),
                Err(error) => {
                    log::warn!("rolling back transaction: {}", error);
                    if let Err(rollback_error) = self.connection.rollback() {
                        log::error!("rollback failed: {}", rollback_error);
                    }
                    return Err(error);
                }
            }
        }
        self.connection.commit()?;
        Ok(total)
    }
}
