use crate::{Error, Result, Value};
use std::sync::Arc;

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }

    pub fn names(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values[i])
    }

    /// Arity guard for marshalling, [`Error::RowShapeMismatch`] on
    /// disagreement.
    pub fn expect_arity(&self, expected: usize) -> Result<()> {
        if self.values.len() != expected {
            return Err(Error::RowShapeMismatch {
                expected,
                found: self.values.len(),
            });
        }
        Ok(())
    }
}

/// Typed record marshalled to and from a [`Row`] with a fixed column
/// order. Implementations agree on that order with the query or insert
/// command they pair with; `from_row(to_row(v))` must reproduce `v`.
pub trait Record: Sized {
    /// Column names in marshalling order.
    const COLUMNS: &'static [&'static str];

    /// Encode into a row following [`Record::COLUMNS`].
    fn to_row(&self) -> Result<Row>;

    /// Decode a fetched row. Fails with [`Error::RowShapeMismatch`] when
    /// the arity disagrees and [`Error::DecodingError`] when a position
    /// holds the wrong storage class.
    fn from_row(row: &RowLabeled) -> Result<Self>;
}
