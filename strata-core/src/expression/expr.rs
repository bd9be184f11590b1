use crate::{
    AggregateFn, AsValue, BinaryOpType, ColumnRef, ColumnType, Error, Order, OrderTarget, Ordered,
    Result, StorageClass, UnaryOpType, Value,
};
use std::fmt::{self, Display, Formatter};

/// A typed expression tree. Column nodes are produced by
/// [`TableRef::col`](crate::TableRef::col) and carry their declared type, so
/// operator compatibility is checked while the tree is built; the validator
/// re-resolves every column against the query scope before rendering.
#[derive(Debug, Clone)]
pub enum Expr {
    Column(ColumnRef, ColumnType),
    Literal(Value),
    Binary(BinaryOpType, Box<Expr>, Box<Expr>),
    Unary(UnaryOpType, Box<Expr>),
    Aggregate(AggregateFn, Box<Expr>),
}

/// Coarse expression type used by the compatibility rules. Distinct from
/// [`StorageClass`] because comparisons produce booleans, which are not a
/// storage class of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Bool,
    Num,
    Text,
    Blob,
    Null,
}

impl Kind {
    pub(crate) fn of_class(class: StorageClass) -> Kind {
        match class {
            StorageClass::Integer | StorageClass::Real => Kind::Num,
            StorageClass::Text => Kind::Text,
            StorageClass::Blob => Kind::Blob,
        }
    }

    pub(crate) fn of_value(value: &Value) -> Kind {
        if value.is_null() {
            Kind::Null
        } else if matches!(value, Value::Boolean(..)) {
            Kind::Bool
        } else {
            Kind::of_class(value.storage_class().expect("non-null value has a class"))
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Bool => "boolean",
            Kind::Num => "numeric",
            Kind::Text => "text",
            Kind::Blob => "blob",
            Kind::Null => "NULL",
        })
    }
}

fn same_or_null(lhs: Kind, rhs: Kind) -> bool {
    lhs == Kind::Null || rhs == Kind::Null || lhs == rhs
}

/// Result kind of a binary operation, or `TypeMismatch`.
pub(crate) fn binary_kind(op: BinaryOpType, lhs: Kind, rhs: Kind) -> Result<Kind> {
    let ok = if op.is_logical() {
        same_or_null(lhs, Kind::Bool) && same_or_null(rhs, Kind::Bool)
    } else if op.is_comparison() {
        same_or_null(lhs, rhs)
    } else if op == BinaryOpType::Like {
        same_or_null(lhs, Kind::Text) && same_or_null(rhs, Kind::Text)
    } else {
        same_or_null(lhs, Kind::Num) && same_or_null(rhs, Kind::Num)
    };
    if !ok {
        return Err(Error::TypeMismatch(format!(
            "cannot apply `{}` to {} and {}",
            op, lhs, rhs
        )));
    }
    Ok(if op.is_arithmetic() { Kind::Num } else { Kind::Bool })
}

pub(crate) fn unary_kind(op: UnaryOpType, value: Kind) -> Result<Kind> {
    let expected = match op {
        UnaryOpType::Not => Kind::Bool,
        UnaryOpType::Negative => Kind::Num,
    };
    if !same_or_null(value, expected) {
        return Err(Error::TypeMismatch(format!(
            "cannot apply `{}` to {}",
            op, value
        )));
    }
    Ok(expected)
}

pub(crate) fn aggregate_kind(func: AggregateFn, arg: Kind) -> Result<Kind> {
    if func != AggregateFn::Count && !same_or_null(arg, Kind::Num) {
        return Err(Error::TypeMismatch(format!(
            "{} takes a numeric argument, found {}",
            func.sql_name(),
            arg
        )));
    }
    Ok(Kind::Num)
}

impl Expr {
    /// A literal parameter value.
    pub fn value(value: impl AsValue) -> Result<Expr> {
        Ok(Expr::Literal(value.as_value()?))
    }

    pub fn null() -> Expr {
        Expr::Literal(Value::Null)
    }

    pub(crate) fn kind(&self) -> Result<Kind> {
        match self {
            Expr::Column(_, ty) => Ok(Kind::of_class(ty.class)),
            Expr::Literal(value) => Ok(Kind::of_value(value)),
            Expr::Binary(op, lhs, rhs) => binary_kind(*op, lhs.kind()?, rhs.kind()?),
            Expr::Unary(op, value) => unary_kind(*op, value.kind()?),
            Expr::Aggregate(func, arg) => aggregate_kind(*func, arg.kind()?),
        }
    }

    /// Storage type this expression yields in a result row. Booleans are
    /// reported as INTEGER, matching how they travel on the wire.
    pub fn result_type(&self) -> ColumnType {
        match self {
            Expr::Column(_, ty) => *ty,
            Expr::Literal(value) => ColumnType {
                class: value.storage_class().unwrap_or(StorageClass::Integer),
                nullable: value.is_null(),
            },
            Expr::Binary(op, lhs, rhs) => {
                if op.is_arithmetic() {
                    let lhs = lhs.result_type();
                    let rhs = rhs.result_type();
                    ColumnType {
                        class: if lhs.class == StorageClass::Real
                            || rhs.class == StorageClass::Real
                        {
                            StorageClass::Real
                        } else {
                            StorageClass::Integer
                        },
                        nullable: lhs.nullable || rhs.nullable,
                    }
                } else {
                    ColumnType::new(StorageClass::Integer)
                }
            }
            Expr::Unary(UnaryOpType::Negative, value) => value.result_type(),
            Expr::Unary(UnaryOpType::Not, _) => ColumnType::new(StorageClass::Integer),
            Expr::Aggregate(func, arg) => match func {
                AggregateFn::Count => ColumnType::new(StorageClass::Integer),
                AggregateFn::Avg => ColumnType::nullable(StorageClass::Real),
                AggregateFn::Min | AggregateFn::Max | AggregateFn::Sum => ColumnType {
                    class: arg.result_type().class,
                    nullable: true,
                },
            },
        }
    }

    fn binary(self, op: BinaryOpType, rhs: Expr) -> Result<Expr> {
        binary_kind(op, self.kind()?, rhs.kind()?)?;
        Ok(Expr::Binary(op, Box::new(self), Box::new(rhs)))
    }

    pub fn eq(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::Equal, rhs)
    }
    pub fn ne(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::NotEqual, rhs)
    }
    pub fn lt(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::Less, rhs)
    }
    pub fn le(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::LessEqual, rhs)
    }
    pub fn gt(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::Greater, rhs)
    }
    pub fn ge(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::GreaterEqual, rhs)
    }
    pub fn like(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::Like, rhs)
    }
    pub fn and(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::And, rhs)
    }
    pub fn or(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::Or, rhs)
    }
    pub fn add(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::Addition, rhs)
    }
    pub fn sub(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::Subtraction, rhs)
    }
    pub fn mul(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::Multiplication, rhs)
    }
    pub fn div(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::Division, rhs)
    }
    pub fn rem(self, rhs: Expr) -> Result<Expr> {
        self.binary(BinaryOpType::Remainder, rhs)
    }

    pub fn not(self) -> Result<Expr> {
        unary_kind(UnaryOpType::Not, self.kind()?)?;
        Ok(Expr::Unary(UnaryOpType::Not, Box::new(self)))
    }
    pub fn neg(self) -> Result<Expr> {
        unary_kind(UnaryOpType::Negative, self.kind()?)?;
        Ok(Expr::Unary(UnaryOpType::Negative, Box::new(self)))
    }

    /// COUNT accepts any argument.
    pub fn count(self) -> Expr {
        Expr::Aggregate(AggregateFn::Count, Box::new(self))
    }

    /// `COUNT(*)`.
    pub fn count_all() -> Expr {
        Expr::null().count()
    }
    pub fn avg(self) -> Result<Expr> {
        self.aggregate(AggregateFn::Avg)
    }
    pub fn min(self) -> Result<Expr> {
        self.aggregate(AggregateFn::Min)
    }
    pub fn max(self) -> Result<Expr> {
        self.aggregate(AggregateFn::Max)
    }
    pub fn sum(self) -> Result<Expr> {
        self.aggregate(AggregateFn::Sum)
    }

    fn aggregate(self, func: AggregateFn) -> Result<Expr> {
        aggregate_kind(func, self.kind()?)?;
        Ok(Expr::Aggregate(func, Box::new(self)))
    }

    pub fn asc(self) -> Ordered {
        Ordered {
            target: OrderTarget::Expr(self),
            order: Order::Asc,
        }
    }
    pub fn desc(self) -> Ordered {
        Ordered {
            target: OrderTarget::Expr(self),
            order: Order::Desc,
        }
    }

    /// Whether any part of the tree is an aggregate call.
    pub fn has_aggregate(&self) -> bool {
        match self {
            Expr::Aggregate(..) => true,
            Expr::Binary(_, lhs, rhs) => lhs.has_aggregate() || rhs.has_aggregate(),
            Expr::Unary(_, value) => value.has_aggregate(),
            Expr::Column(..) | Expr::Literal(..) => false,
        }
    }
}
