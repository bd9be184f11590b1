use crate::{Expr, TableRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL OUTER JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

/// One JOIN clause. A `Using` condition is expanded by the validator into
/// the equivalent `On` equality chain; validated queries only carry `On`
/// (or `None` for cross joins).
#[derive(Debug, Clone)]
pub struct Join {
    pub join: JoinType,
    pub table: TableRef,
    pub condition: JoinCondition,
}

#[derive(Debug, Clone)]
pub enum JoinCondition {
    On(Expr),
    Using(Vec<String>),
    None,
}
