use crate::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// One ORDER BY entry: an expression or a SELECT-list label, plus the
/// direction.
#[derive(Debug, Clone)]
pub struct Ordered {
    pub target: OrderTarget,
    pub order: Order,
}

#[derive(Debug, Clone)]
pub enum OrderTarget {
    Expr(Expr),
    /// A SELECT alias, or an unqualified column name as a fallback.
    Label(String),
}

impl Ordered {
    pub fn label(label: impl Into<String>, order: Order) -> Self {
        Self {
            target: OrderTarget::Label(label.into()),
            order,
        }
    }
}
