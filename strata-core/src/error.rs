use thiserror::Error;

/// Everything that can go wrong between declaring a schema and stepping a
/// statement. All variants except [`Error::Driver`] are produced before any
/// SQL text exists; `Driver` wraps failures the engine reports at execution
/// time (constraint violations, I/O, disk full).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("duplicate column `{column}` in table `{table}`")]
    DuplicateColumn { table: String, column: String },
    #[error("unknown column `{0}`")]
    UnknownColumn(String),
    #[error("ambiguous column `{0}`, qualify it with a table alias")]
    AmbiguousColumn(String),
    #[error("duplicate table alias `{0}` in FROM clause")]
    DuplicateAlias(String),
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("column `{column}` holds {expected} but the value is {found}")]
    ColumnTypeMismatch {
        column: String,
        expected: String,
        found: String,
    },
    #[error("column `{0}` must appear in GROUP BY or inside an aggregate")]
    InvalidGrouping(String),
    #[error("encoding error: {0}")]
    EncodingError(String),
    #[error("decoding error: {0}")]
    DecodingError(String),
    #[error("row shape mismatch: expected {expected} values, found {found}")]
    RowShapeMismatch { expected: usize, found: usize },
    #[error("driver error {code}: {message}")]
    Driver { code: i32, message: String },
}

impl Error {
    pub fn driver(code: i32, message: impl Into<String>) -> Self {
        Error::Driver {
            code,
            message: message.into(),
        }
    }
}
