//! Schema-aware SQL construction.
//!
//! Declare table schemas once as plain values, build queries and commands
//! that are validated against those schemas before any SQL exists, and
//! render the validated statements to parameterized SQL. Execution goes
//! through a driver; `strata-memory` provides a logging driver for tests.
//!
//! ```
//! use strata::{ColumnDef, ColumnType, Expr, Select, StorageClass, TableDef, TableRef};
//!
//! # fn main() -> strata::Result<()> {
//! let employees = TableDef::new(
//!     "Employees",
//!     [
//!         ColumnDef::new("id", ColumnType::new(StorageClass::Integer)),
//!         ColumnDef::new("name", ColumnType::new(StorageClass::Text)),
//!         ColumnDef::new("salary", ColumnType::new(StorageClass::Real)),
//!     ],
//! )?
//! .shared();
//!
//! let e = TableRef::aliased(&employees, "e");
//! let query = Select::from(e.clone())
//!     .column(e.col("name")?)
//!     .filter(e.col("salary")?.gt(Expr::value(3000.0)?)?)
//!     .finish()?;
//! # let _ = query;
//! # Ok(())
//! # }
//! ```

pub use strata_core::*;
