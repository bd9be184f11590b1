use crate::{
    ColumnType, Expr, Join, JoinCondition, JoinType, OrderTarget, Ordered, Result, TableRef,
    validator,
};

/// One SELECT-list entry. The alias, when present, becomes a queryable name
/// visible in ORDER BY and GROUP BY (not in WHERE).
#[derive(Debug, Clone)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectItem {
    /// Label the entry contributes to the result shape.
    pub fn label(&self, position: usize) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }
        match &self.expr {
            Expr::Column(column, _) => column.name.clone(),
            Expr::Aggregate(func, _) => func.label().to_owned(),
            _ => format!("column{}", position + 1),
        }
    }
}

/// SELECT query under construction. Compose clauses freely, then call
/// [`Select::finish`] to run the validator and obtain an immutable
/// [`Query`].
#[derive(Debug, Clone)]
pub struct Select {
    pub from: TableRef,
    pub joins: Vec<Join>,
    pub items: Vec<SelectItem>,
    pub filter: Option<Expr>,
    pub group_by: Vec<OrderTarget>,
    pub order_by: Vec<Ordered>,
}

impl Select {
    pub fn from(table: TableRef) -> Self {
        Self {
            from: table,
            joins: Vec::new(),
            items: Vec::new(),
            filter: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
        }
    }

    pub fn join(mut self, join: JoinType, table: TableRef, on: Expr) -> Self {
        self.joins.push(Join {
            join,
            table,
            condition: JoinCondition::On(on),
        });
        self
    }

    /// Join on a list of column names visible on both sides; the validator
    /// expands the list into an equality condition.
    pub fn join_using<S: Into<String>>(
        mut self,
        join: JoinType,
        table: TableRef,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.joins.push(Join {
            join,
            table,
            condition: JoinCondition::Using(columns.into_iter().map(Into::into).collect()),
        });
        self
    }

    pub fn cross_join(mut self, table: TableRef) -> Self {
        self.joins.push(Join {
            join: JoinType::Cross,
            table,
            condition: JoinCondition::None,
        });
        self
    }

    pub fn column(mut self, expr: Expr) -> Self {
        self.items.push(SelectItem { expr, alias: None });
        self
    }

    pub fn column_as(mut self, expr: Expr, alias: impl Into<String>) -> Self {
        self.items.push(SelectItem {
            expr,
            alias: Some(alias.into()),
        });
        self
    }

    /// WHERE condition. A later call replaces an earlier one; compose
    /// conjunctions with [`Expr::and`].
    pub fn filter(mut self, condition: Expr) -> Self {
        self.filter = Some(condition);
        self
    }

    pub fn group_by(mut self, column: Expr) -> Self {
        self.group_by.push(OrderTarget::Expr(column));
        self
    }

    /// Group by a SELECT alias, or an unqualified column name as a
    /// fallback.
    pub fn group_by_label(mut self, label: impl Into<String>) -> Self {
        self.group_by.push(OrderTarget::Label(label.into()));
        self
    }

    pub fn order_by(mut self, entry: Ordered) -> Self {
        self.order_by.push(entry);
        self
    }

    /// Validate and freeze. The returned [`Query`] is guaranteed renderable.
    pub fn finish(self) -> Result<Query> {
        validator::validate_select(self)
    }
}

/// A validated SELECT. USING joins have been normalized to ON conditions
/// and the result shape is fixed: one `(label, type)` pair per SELECT-list
/// entry, in order.
#[derive(Debug, Clone)]
pub struct Query {
    pub(crate) select: Select,
    pub(crate) shape: Vec<(String, ColumnType)>,
}

impl Query {
    pub fn shape(&self) -> &[(String, ColumnType)] {
        &self.shape
    }

    pub fn select(&self) -> &Select {
        &self.select
    }
}
