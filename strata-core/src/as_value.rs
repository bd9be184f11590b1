use crate::{Error, Result, Value};
use std::any;

/// Conversion between native Rust scalars and the dynamically typed
/// [`Value`] that backs query parameters and row decoding.
///
/// `try_from_value` never coerces across storage classes: decoding a TEXT
/// cell into an `i64` is a [`Error::DecodingError`], not a parse attempt.
/// Narrow integer widths decode from INTEGER with a range check.
pub trait AsValue {
    /// A NULL-flavored value of the variant this type encodes to.
    fn as_empty_value() -> Value;
    /// Convert into the owned [`Value`] representation. Fails with
    /// [`Error::EncodingError`] when the value does not fit the storage
    /// class, e.g. a `u64` above `i64::MAX`.
    fn as_value(self) -> Result<Value>;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

fn mismatch<T>(value: &Value) -> Error {
    Error::DecodingError(format!(
        "cannot decode {:?} into {}",
        value,
        any::type_name::<T>()
    ))
}

macro_rules! impl_as_value_int {
    ($source:ty) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                Value::Integer(None)
            }
            fn as_value(self) -> Result<Value> {
                Ok(Value::Integer(Some(self as i64)))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Integer(Some(v)) => {
                        <$source>::try_from(v).map_err(|_| {
                            Error::DecodingError(format!(
                                "{} does not fit into {}",
                                v,
                                any::type_name::<$source>()
                            ))
                        })
                    }
                    v => Err(mismatch::<$source>(&v)),
                }
            }
        }
    };
}

impl_as_value_int!(i8);
impl_as_value_int!(i16);
impl_as_value_int!(i32);
impl_as_value_int!(i64);
impl_as_value_int!(u8);
impl_as_value_int!(u16);
impl_as_value_int!(u32);

impl AsValue for u64 {
    fn as_empty_value() -> Value {
        Value::Integer(None)
    }
    fn as_value(self) -> Result<Value> {
        i64::try_from(self)
            .map(|v| Value::Integer(Some(v)))
            .map_err(|_| {
                Error::EncodingError(format!("{} does not fit the INTEGER storage class", self))
            })
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(Some(v)) => u64::try_from(v)
                .map_err(|_| Error::DecodingError(format!("{} does not fit into u64", v))),
            v => Err(mismatch::<u64>(&v)),
        }
    }
}

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Result<Value> {
        Ok(Value::Boolean(Some(self)))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(Some(v)) => Ok(v),
            Value::Integer(Some(v)) => Ok(v != 0),
            v => Err(mismatch::<bool>(&v)),
        }
    }
}

impl AsValue for f32 {
    fn as_empty_value() -> Value {
        Value::Real(None)
    }
    fn as_value(self) -> Result<Value> {
        Ok(Value::Real(Some(self as f64)))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Real(Some(v)) => Ok(v as f32),
            v => Err(mismatch::<f32>(&v)),
        }
    }
}

impl AsValue for f64 {
    fn as_empty_value() -> Value {
        Value::Real(None)
    }
    fn as_value(self) -> Result<Value> {
        Ok(Value::Real(Some(self)))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Real(Some(v)) => Ok(v),
            v => Err(mismatch::<f64>(&v)),
        }
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Text(None)
    }
    fn as_value(self) -> Result<Value> {
        Ok(Value::Text(Some(self)))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(Some(v)) => Ok(v),
            v => Err(mismatch::<String>(&v)),
        }
    }
}

impl AsValue for &str {
    fn as_empty_value() -> Value {
        Value::Text(None)
    }
    fn as_value(self) -> Result<Value> {
        Ok(Value::Text(Some(self.to_owned())))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Err(mismatch::<&str>(&value))
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Result<Value> {
        Ok(Value::Blob(Some(self.into_boxed_slice())))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v.into_vec()),
            v => Err(mismatch::<Vec<u8>>(&v)),
        }
    }
}

impl AsValue for Box<[u8]> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Result<Value> {
        Ok(Value::Blob(Some(self)))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v),
            v => Err(mismatch::<Box<[u8]>>(&v)),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Result<Value> {
        match self {
            Some(v) => v.as_value(),
            None => Ok(T::as_empty_value()),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}
