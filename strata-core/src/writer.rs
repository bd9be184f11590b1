use crate::{
    ColumnRef, ColumnType, Command, Constraint, Expr, JoinCondition, Ordered, OrderTarget, Query,
    Rendered, StorageClass, TableDef, TableRef, UnaryOpType, Value,
    expression::{AggregateFn, BinaryOpType},
    possibly_parenthesized, separated_by,
};
use std::fmt::Write;

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($out:ident, $value:expr) => {{
        let mut buffer = ryu::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

/// Where literal values go while rendering: pushed onto the parameter list
/// behind a `?` placeholder (queries, inserts), or written inline for DDL,
/// where engines reject placeholders.
pub enum Placeholders<'a> {
    Bind(&'a mut Vec<Value>),
    Inline,
}

/// Renders validated trees into SQL text. All methods are pure appenders;
/// the default implementations produce the engine-agnostic dialect and a
/// driver overrides only what its backend spells differently.
pub trait SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter;

    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + 1;
            }
        }
        out.push_str(&value[position..]);
    }

    /// Identifiers are always quoted to tolerate reserved-word collisions.
    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', r#""""#);
        out.push('"');
    }

    fn write_table_ref(&self, out: &mut String, value: &TableRef, is_declaration: bool) {
        if is_declaration {
            self.write_identifier_quoted(out, &value.table.name);
            if !value.alias.is_empty() {
                out.push(' ');
                self.write_identifier_quoted(out, &value.alias);
            }
        } else {
            self.write_identifier_quoted(out, value.qualifier());
        }
    }

    fn write_column_ref(&self, out: &mut String, value: &ColumnRef) {
        if !value.qualifier.is_empty() {
            self.write_identifier_quoted(out, &value.qualifier);
            out.push('.');
        }
        self.write_identifier_quoted(out, &value.name);
    }

    fn write_column_type(&self, out: &mut String, value: &ColumnType) {
        out.push_str(match value.class {
            StorageClass::Integer => "INTEGER",
            StorageClass::Real => "REAL",
            StorageClass::Text => "TEXT",
            StorageClass::Blob => "BLOB",
        });
    }

    /// Inline value rendering, used only where placeholders cannot go.
    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => out.push_str("NULL"),
            Value::Boolean(Some(v)) => out.push_str(["0", "1"][*v as usize]),
            Value::Integer(Some(v)) => write_integer!(out, *v),
            Value::Real(Some(v)) => write_float!(out, *v),
            Value::Text(Some(v)) => self.write_value_string(out, v),
            Value::Blob(Some(v)) => {
                out.push_str("X'");
                out.push_str(&hex::encode_upper(v));
                out.push('\'');
            }
            _ => unreachable!(),
        }
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_literal(&self, out: &mut String, params: &mut Placeholders, value: &Value) {
        match params {
            Placeholders::Bind(list) => {
                out.push('?');
                list.push(value.clone());
            }
            Placeholders::Inline => self.write_value(out, value),
        }
    }

    fn expression_unary_op_precedence(&self, value: &UnaryOpType) -> i32 {
        match value {
            UnaryOpType::Negative => 1250,
            UnaryOpType::Not => 250,
        }
    }

    fn expression_binary_op_precedence(&self, value: &BinaryOpType) -> i32 {
        match value {
            BinaryOpType::Or => 100,
            BinaryOpType::And => 200,
            BinaryOpType::Equal
            | BinaryOpType::NotEqual
            | BinaryOpType::Less
            | BinaryOpType::Greater
            | BinaryOpType::LessEqual
            | BinaryOpType::GreaterEqual => 300,
            BinaryOpType::Like => 400,
            BinaryOpType::Addition | BinaryOpType::Subtraction => 800,
            BinaryOpType::Multiplication | BinaryOpType::Division | BinaryOpType::Remainder => 900,
        }
    }

    fn expression_precedence(&self, value: &Expr) -> i32 {
        match value {
            Expr::Binary(op, ..) => self.expression_binary_op_precedence(op),
            Expr::Unary(op, ..) => self.expression_unary_op_precedence(op),
            Expr::Column(..) | Expr::Literal(..) | Expr::Aggregate(..) => 1_000_000,
        }
    }

    fn write_expression(&self, out: &mut String, params: &mut Placeholders, value: &Expr) {
        match value {
            Expr::Column(column, _) => self.write_column_ref(out, column),
            Expr::Literal(v) => self.write_literal(out, params, v),
            Expr::Binary(op, lhs, rhs) => {
                let precedence = self.expression_binary_op_precedence(op);
                possibly_parenthesized!(
                    out,
                    self.expression_precedence(lhs) < precedence,
                    self.write_expression(out, params, lhs)
                );
                let _ = write!(out, " {} ", op);
                possibly_parenthesized!(
                    out,
                    self.expression_precedence(rhs) <= precedence,
                    self.write_expression(out, params, rhs)
                );
            }
            Expr::Unary(op, v) => {
                match op {
                    UnaryOpType::Not => out.push_str("NOT "),
                    UnaryOpType::Negative => out.push('-'),
                }
                possibly_parenthesized!(
                    out,
                    self.expression_precedence(v) <= self.expression_unary_op_precedence(op),
                    self.write_expression(out, params, v)
                );
            }
            Expr::Aggregate(func, arg) => {
                out.push_str(func.sql_name());
                out.push('(');
                if *func == AggregateFn::Count && matches!(arg.as_ref(), Expr::Literal(v) if v.is_null())
                {
                    out.push('*');
                } else {
                    self.write_expression(out, params, arg);
                }
                out.push(')');
            }
        }
    }

    fn write_ordered(&self, out: &mut String, params: &mut Placeholders, value: &Ordered) {
        match &value.target {
            OrderTarget::Expr(expr) => self.write_expression(out, params, expr),
            OrderTarget::Label(label) => self.write_identifier_quoted(out, label),
        }
        out.push_str(match value.order {
            crate::Order::Asc => " ASC",
            crate::Order::Desc => " DESC",
        });
    }

    fn write_select(&self, out: &mut String, params: &mut Vec<Value>, query: &Query) {
        let select = query.select();
        let mut params = Placeholders::Bind(params);
        out.push_str("SELECT ");
        if select.items.is_empty() {
            out.push('*');
        } else {
            separated_by(
                out,
                &select.items,
                |out, item| {
                    self.write_expression(out, &mut params, &item.expr);
                    if let Some(alias) = &item.alias {
                        out.push_str(" AS ");
                        self.write_identifier_quoted(out, alias);
                    }
                },
                ", ",
            );
        }
        out.push_str("\nFROM ");
        self.write_table_ref(out, &select.from, true);
        for join in &select.joins {
            out.push(' ');
            out.push_str(join.join.sql_keyword());
            out.push(' ');
            self.write_table_ref(out, &join.table, true);
            if let JoinCondition::On(condition) = &join.condition {
                out.push_str(" ON ");
                self.write_expression(out, &mut params, condition);
            }
        }
        if let Some(filter) = &select.filter {
            out.push_str("\nWHERE ");
            self.write_expression(out, &mut params, filter);
        }
        if !select.group_by.is_empty() {
            out.push_str("\nGROUP BY ");
            separated_by(
                out,
                &select.group_by,
                |out, entry| match entry {
                    OrderTarget::Expr(column) => self.write_expression(out, &mut params, column),
                    OrderTarget::Label(label) => self.write_identifier_quoted(out, label),
                },
                ", ",
            );
        }
        if !select.order_by.is_empty() {
            out.push_str("\nORDER BY ");
            separated_by(
                out,
                &select.order_by,
                |out, entry| self.write_ordered(out, &mut params, entry),
                ", ",
            );
        }
        out.push(';');
    }

    fn write_create_table(&self, out: &mut String, table: &TableDef, if_not_exists: bool) {
        out.push_str("CREATE TABLE ");
        if if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_identifier_quoted(out, &table.name);
        out.push_str(" (\n");
        let autoincrement = table.constraints.iter().find_map(|c| match c {
            Constraint::AutoIncrement(name) => Some(name.as_str()),
            _ => None,
        });
        separated_by(
            out,
            &table.columns,
            |out, column| {
                self.write_identifier_quoted(out, &column.name);
                out.push(' ');
                self.write_column_type(out, &column.ty);
                if autoincrement == Some(column.name.as_str()) {
                    out.push_str(" PRIMARY KEY AUTOINCREMENT");
                } else if !column.ty.nullable
                    || table
                        .constraints
                        .iter()
                        .any(|c| matches!(c, Constraint::NotNull(n) if n == &column.name))
                {
                    out.push_str(" NOT NULL");
                }
            },
            ",\n",
        );
        for constraint in &table.constraints {
            match constraint {
                Constraint::PrimaryKey(columns) => {
                    // The key already rendered on the AUTOINCREMENT column.
                    if columns.iter().map(String::as_str).eq(autoincrement) {
                        continue;
                    }
                    out.push_str(",\nPRIMARY KEY (");
                    separated_by(
                        out,
                        columns,
                        |out, name| self.write_identifier_quoted(out, name),
                        ", ",
                    );
                    out.push(')');
                }
                Constraint::Unique(columns) => {
                    out.push_str(",\nUNIQUE (");
                    separated_by(
                        out,
                        columns,
                        |out, name| self.write_identifier_quoted(out, name),
                        ", ",
                    );
                    out.push(')');
                }
                Constraint::ForeignKey {
                    table: target,
                    columns,
                    references,
                } => {
                    out.push_str(",\nFOREIGN KEY (");
                    separated_by(
                        out,
                        columns,
                        |out, name| self.write_identifier_quoted(out, name),
                        ", ",
                    );
                    out.push_str(") REFERENCES ");
                    self.write_identifier_quoted(out, &target.name);
                    out.push_str(" (");
                    separated_by(
                        out,
                        references,
                        |out, name| self.write_identifier_quoted(out, name),
                        ", ",
                    );
                    out.push(')');
                }
                Constraint::Check(expr) => {
                    out.push_str(",\nCHECK (");
                    self.write_expression(out, &mut Placeholders::Inline, expr);
                    out.push(')');
                }
                // Both render on their column line.
                Constraint::AutoIncrement(..) | Constraint::NotNull(..) => {}
            }
        }
        out.push_str("\n);");
    }

    fn write_drop_table(&self, out: &mut String, table: &TableDef, if_exists: bool) {
        out.push_str("DROP TABLE ");
        if if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_identifier_quoted(out, &table.name);
        out.push(';');
    }

    fn write_insert(
        &self,
        out: &mut String,
        params: &mut Vec<Value>,
        table: &TableDef,
        columns: &[String],
        values: &[Value],
    ) {
        out.push_str("INSERT INTO ");
        self.write_identifier_quoted(out, &table.name);
        out.push_str(" (");
        separated_by(
            out,
            columns,
            |out, name| self.write_identifier_quoted(out, name),
            ", ",
        );
        out.push_str(") VALUES (");
        let mut params = Placeholders::Bind(params);
        separated_by(
            out,
            values,
            |out, value| self.write_literal(out, &mut params, value),
            ", ",
        );
        out.push_str(");");
    }

    /// Deterministic `(sql, params)` for a validated query.
    fn render_query(&self, query: &Query) -> Rendered {
        let mut rendered = Rendered::new();
        self.write_select(&mut rendered.sql, &mut rendered.params, query);
        rendered
    }

    /// Deterministic `(sql, params)` for a validated command.
    fn render_command(&self, command: &Command) -> Rendered {
        let mut rendered = Rendered::new();
        match command {
            Command::CreateTable {
                table,
                if_not_exists,
            } => self.write_create_table(&mut rendered.sql, table, *if_not_exists),
            Command::DropTable { table, if_exists } => {
                self.write_drop_table(&mut rendered.sql, table, *if_exists)
            }
            Command::Insert {
                table,
                columns,
                values,
            } => self.write_insert(
                &mut rendered.sql,
                &mut rendered.params,
                table,
                columns,
                values,
            ),
        }
        rendered
    }
}

pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Default for GenericSqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
