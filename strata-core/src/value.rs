use std::fmt::{self, Display, Formatter, Write};

/// The closed set of primitive kinds a database column can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Integer,
    Real,
    Text,
    Blob,
}

impl StorageClass {
    pub fn is_numeric(&self) -> bool {
        matches!(self, StorageClass::Integer | StorageClass::Real)
    }

    /// Whether a column of this class can store a value of class `other`.
    /// REAL columns accept INTEGER values, everything else is exact.
    pub fn accepts(&self, other: StorageClass) -> bool {
        *self == other || (*self == StorageClass::Real && other == StorageClass::Integer)
    }
}

impl Display for StorageClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageClass::Integer => "INTEGER",
            StorageClass::Real => "REAL",
            StorageClass::Text => "TEXT",
            StorageClass::Blob => "BLOB",
        })
    }
}

/// Declared type of a column: a storage class plus nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnType {
    pub class: StorageClass,
    pub nullable: bool,
}

impl ColumnType {
    pub const fn new(class: StorageClass) -> Self {
        Self {
            class,
            nullable: false,
        }
    }

    pub const fn nullable(class: StorageClass) -> Self {
        Self {
            class,
            nullable: true,
        }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.class.fmt(f)?;
        if self.nullable {
            f.write_str(" NULL")?;
        }
        Ok(())
    }
}

/// A dynamically typed scalar, either a query parameter or a cell of a
/// fetched row. Every variant carries `Option` so that a typed NULL can be
/// told apart from the bare [`Value::Null`] marker.
///
/// Booleans have no storage class of their own, they travel as INTEGER.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Integer(Option<i64>),
    Real(Option<f64>),
    Text(Option<String>),
    Blob(Option<Box<[u8]>>),
}

impl Value {
    /// Storage class of the value, `None` for NULL of any flavor.
    pub fn storage_class(&self) -> Option<StorageClass> {
        if self.is_null() {
            return None;
        }
        Some(match self {
            Value::Boolean(..) | Value::Integer(..) => StorageClass::Integer,
            Value::Real(..) => StorageClass::Real,
            Value::Text(..) => StorageClass::Text,
            Value::Blob(..) => StorageClass::Blob,
            Value::Null => unreachable!(),
        })
    }

    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Integer(v) => v.is_none(),
            Value::Real(v) => v.is_none(),
            Value::Text(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
        }
    }

    pub fn same_type(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            v if v.is_null() => f.write_str("NULL"),
            Value::Boolean(Some(v)) => f.write_str(["false", "true"][*v as usize]),
            Value::Integer(Some(v)) => {
                let mut buffer = itoa::Buffer::new();
                f.write_str(buffer.format(*v))
            }
            Value::Real(Some(v)) => {
                let mut buffer = ryu::Buffer::new();
                f.write_str(buffer.format(*v))
            }
            Value::Text(Some(v)) => write!(f, "'{}'", v),
            Value::Blob(Some(v)) => {
                f.write_str("X'")?;
                f.write_str(&hex::encode_upper(v))?;
                f.write_char('\'')
            }
            _ => unreachable!(),
        }
    }
}
