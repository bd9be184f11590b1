use crate::{Connection, Prepared, SqlWriter};

/// A database backend: the connection type, the prepared-statement handle
/// and the SQL dialect writer belong together.
pub trait Driver {
    type Connection: Connection<Driver = Self>;
    type Prepared: Prepared;
    type SqlWriter: SqlWriter;

    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
