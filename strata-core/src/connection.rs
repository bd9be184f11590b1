use crate::{Driver, Result, RowsAffected};

/// An open database connection. Statement execution over one connection is
/// serialized by exclusive borrow: the [`Executor`](crate::Executor) holds
/// `&mut self` for the duration of a statement or transaction.
pub trait Connection {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    fn prepare(&mut self, sql: &str) -> Result<<Self::Driver as Driver>::Prepared>;

    fn begin(&mut self) -> Result<()>;
    fn commit(&mut self) -> Result<()>;
    fn rollback(&mut self) -> Result<()>;

    /// Effect of the most recently completed statement.
    fn rows_affected(&self) -> RowsAffected;
}
