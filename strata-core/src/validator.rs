//! Referential-integrity checks over constructed queries and commands.
//!
//! Validation is pure: it walks the tree, resolves every column reference
//! against the declared schemas visible in the FROM/JOIN scope and verifies
//! the storage-class rules, without ever touching a database. A tree that
//! passes is guaranteed renderable. The first violation wins.

use crate::{
    ColumnDef, ColumnRef, Command, Constraint, Error, Expr, Join, JoinCondition, OrderTarget,
    Query, Result, Select, TableRef,
    expression::{Kind, aggregate_kind, binary_kind, unary_kind},
};

/// The tables visible to column resolution, in FROM/JOIN order.
struct Scope<'a> {
    tables: Vec<&'a TableRef>,
}

impl<'a> Scope<'a> {
    fn new() -> Self {
        Self { tables: Vec::new() }
    }

    fn add(&mut self, table: &'a TableRef) -> Result<()> {
        if self
            .tables
            .iter()
            .any(|t| t.qualifier() == table.qualifier())
        {
            return Err(Error::DuplicateAlias(table.qualifier().to_owned()));
        }
        self.tables.push(table);
        Ok(())
    }

    /// Resolve to exactly one visible column: the table index and its
    /// definition. `limit` restricts the search to the first tables, used
    /// for the left side of a USING join.
    fn resolve_among(&self, column: &ColumnRef, limit: usize) -> Result<(usize, &'a ColumnDef)> {
        let tables = &self.tables[..limit];
        if !column.qualifier.is_empty() {
            let (index, table) = tables
                .iter()
                .enumerate()
                .find(|(_, t)| t.qualifier() == column.qualifier)
                .ok_or_else(|| Error::UnknownColumn(column.to_string()))?;
            let def = table
                .table
                .column(&column.name)
                .ok_or_else(|| Error::UnknownColumn(column.name.clone()))?;
            return Ok((index, def));
        }
        let mut found = None;
        for (index, table) in tables.iter().enumerate() {
            if let Some(def) = table.table.column(&column.name) {
                if found.is_some() {
                    return Err(Error::AmbiguousColumn(column.name.clone()));
                }
                found = Some((index, def));
            }
        }
        found.ok_or_else(|| Error::UnknownColumn(column.name.clone()))
    }

    fn resolve(&self, column: &ColumnRef) -> Result<(usize, &'a ColumnDef)> {
        self.resolve_among(column, self.tables.len())
    }
}

/// Kind of an expression with every column resolved against the scope.
/// This is the authoritative counterpart of [`Expr::kind`], which trusts
/// the types recorded at construction time.
fn check_expr(expr: &Expr, scope: &Scope) -> Result<Kind> {
    match expr {
        Expr::Column(column, _) => {
            let (_, def) = scope.resolve(column)?;
            Ok(Kind::of_class(def.ty.class))
        }
        Expr::Literal(value) => Ok(Kind::of_value(value)),
        Expr::Binary(op, lhs, rhs) => {
            binary_kind(*op, check_expr(lhs, scope)?, check_expr(rhs, scope)?)
        }
        Expr::Unary(op, value) => unary_kind(*op, check_expr(value, scope)?),
        Expr::Aggregate(func, arg) => aggregate_kind(*func, check_expr(arg, scope)?),
    }
}

fn check_condition(expr: &Expr, scope: &Scope, clause: &str) -> Result<()> {
    let kind = check_expr(expr, scope)?;
    if !matches!(kind, Kind::Bool | Kind::Null) {
        return Err(Error::TypeMismatch(format!(
            "{} condition must be boolean, found {}",
            clause, kind
        )));
    }
    Ok(())
}

/// Columns appearing outside any aggregate call.
fn collect_bare_columns<'e>(expr: &'e Expr, out: &mut Vec<&'e ColumnRef>) {
    match expr {
        Expr::Column(column, _) => out.push(column),
        Expr::Binary(_, lhs, rhs) => {
            collect_bare_columns(lhs, out);
            collect_bare_columns(rhs, out);
        }
        Expr::Unary(_, value) => collect_bare_columns(value, out),
        Expr::Aggregate(..) | Expr::Literal(..) => {}
    }
}

/// All columns, aggregated or not.
fn collect_columns<'e>(expr: &'e Expr, out: &mut Vec<&'e ColumnRef>) {
    match expr {
        Expr::Column(column, _) => out.push(column),
        Expr::Binary(_, lhs, rhs) => {
            collect_columns(lhs, out);
            collect_columns(rhs, out);
        }
        Expr::Unary(_, value) => collect_columns(value, out),
        Expr::Aggregate(_, arg) => collect_columns(arg, out),
        Expr::Literal(..) => {}
    }
}

/// Expand `USING (a, b)` into `l.a = r.a AND l.b = r.b`, where every name
/// must resolve, unambiguously, on both sides.
fn expand_using(
    scope: &Scope,
    left_tables: usize,
    right: &TableRef,
    columns: &[String],
) -> Result<Expr> {
    if columns.is_empty() {
        return Err(Error::TypeMismatch(
            "USING join requires at least one column".into(),
        ));
    }
    let mut condition: Option<Expr> = None;
    for name in columns {
        let (index, left_def) =
            scope.resolve_among(&ColumnRef::unqualified(name.clone()), left_tables)?;
        let right_def = right
            .table
            .column(name)
            .ok_or_else(|| Error::UnknownColumn(name.clone()))?;
        let lhs = Expr::Column(
            ColumnRef::new(scope.tables[index].qualifier(), name.clone()),
            left_def.ty,
        );
        let rhs = Expr::Column(
            ColumnRef::new(right.qualifier(), name.clone()),
            right_def.ty,
        );
        let equality = lhs.eq(rhs)?;
        condition = Some(match condition {
            Some(existing) => existing.and(equality)?,
            None => equality,
        });
    }
    Ok(condition.expect("USING list checked non-empty"))
}

pub(crate) fn validate_select(select: Select) -> Result<Query> {
    // 1.-3. Every FROM/JOIN qualifier is distinct, and a join condition
    // sees only the tables joined so far; USING normalizes to ON.
    let mut scope = Scope::new();
    scope.add(&select.from)?;
    let mut joins = Vec::with_capacity(select.joins.len());
    for join in &select.joins {
        scope.add(&join.table)?;
        let condition = match &join.condition {
            JoinCondition::On(expr) => {
                check_condition(expr, &scope, "join")?;
                JoinCondition::On(expr.clone())
            }
            JoinCondition::Using(columns) => JoinCondition::On(expand_using(
                &scope,
                scope.tables.len() - 1,
                &join.table,
                columns,
            )?),
            JoinCondition::None => JoinCondition::None,
        };
        joins.push(Join {
            join: join.join,
            table: join.table.clone(),
            condition,
        });
    }

    // SELECT list and WHERE. Aliases are not visible inside WHERE.
    for item in &select.items {
        check_expr(&item.expr, &scope)?;
    }
    if let Some(filter) = &select.filter {
        check_condition(filter, &scope, "WHERE")?;
    }

    // 5. Grouping rule, both directions. A label entry resolves against
    // the SELECT aliases first, then as an unqualified column.
    let mut group_ids = Vec::with_capacity(select.group_by.len());
    for group in &select.group_by {
        let column = match group {
            OrderTarget::Expr(Expr::Column(column, _)) => column.clone(),
            OrderTarget::Expr(..) => {
                return Err(Error::TypeMismatch(
                    "GROUP BY entry must be a column reference".into(),
                ));
            }
            OrderTarget::Label(label) => {
                match select.items.iter().find(|i| i.alias.as_deref() == Some(label)) {
                    Some(item) => {
                        let Expr::Column(column, _) = &item.expr else {
                            return Err(Error::TypeMismatch(format!(
                                "GROUP BY label `{}` does not name a column",
                                label
                            )));
                        };
                        column.clone()
                    }
                    None => ColumnRef::unqualified(label.clone()),
                }
            }
        };
        let (index, def) = scope.resolve(&column)?;
        group_ids.push((index, def.name.clone()));
    }
    if !select.group_by.is_empty() {
        for item in &select.items {
            let mut bare = Vec::new();
            collect_bare_columns(&item.expr, &mut bare);
            for column in bare {
                let (index, def) = scope.resolve(column)?;
                if !group_ids.iter().any(|(i, n)| *i == index && n == &def.name) {
                    return Err(Error::InvalidGrouping(def.name.clone()));
                }
            }
        }
        // Each grouping column must itself appear in the SELECT list,
        // directly or inside an aggregate.
        for (index, name) in &group_ids {
            let mut present = false;
            for item in &select.items {
                let mut all = Vec::new();
                collect_columns(&item.expr, &mut all);
                present = all.iter().any(|c| {
                    scope
                        .resolve(c)
                        .is_ok_and(|(i, d)| i == *index && &d.name == name)
                });
                if present {
                    break;
                }
            }
            if !present {
                return Err(Error::InvalidGrouping(name.clone()));
            }
        }
    }

    // 6. ORDER BY resolves against the scope or the SELECT labels; under
    // GROUP BY its bare columns obey the grouping rule as well.
    let grouped = |index: usize, name: &str| {
        group_ids.iter().any(|(i, n)| *i == index && n == name)
    };
    for entry in &select.order_by {
        match &entry.target {
            OrderTarget::Expr(expr) => {
                check_expr(expr, &scope)?;
                if !select.group_by.is_empty() {
                    let mut bare = Vec::new();
                    collect_bare_columns(expr, &mut bare);
                    for column in bare {
                        let (index, def) = scope.resolve(column)?;
                        if !grouped(index, &def.name) {
                            return Err(Error::InvalidGrouping(def.name.clone()));
                        }
                    }
                }
            }
            OrderTarget::Label(label) => {
                let aliased = select.items.iter().any(|i| i.alias.as_deref() == Some(label));
                if !aliased {
                    let (index, def) = scope.resolve(&ColumnRef::unqualified(label.clone()))?;
                    if !select.group_by.is_empty() && !grouped(index, &def.name) {
                        return Err(Error::InvalidGrouping(def.name.clone()));
                    }
                }
            }
        }
    }

    let shape = select
        .items
        .iter()
        .enumerate()
        .map(|(position, item)| (item.label(position), item.expr.result_type()))
        .collect();

    Ok(Query {
        select: Select { joins, ..select },
        shape,
    })
}

fn require_column<'t>(table: &'t crate::TableDef, name: &str) -> Result<&'t ColumnDef> {
    table
        .column(name)
        .ok_or_else(|| Error::UnknownColumn(name.to_owned()))
}

pub(crate) fn validate_command(command: &Command) -> Result<()> {
    match command {
        Command::CreateTable { table, .. } => {
            // The table ends up with at most one primary key however it is
            // spelled: AUTOINCREMENT implies the key on its own column.
            let mut autoincrement = None;
            let mut primary_key: Option<&[String]> = None;
            for constraint in &table.constraints {
                match constraint {
                    Constraint::AutoIncrement(name) => {
                        if autoincrement.replace(name.as_str()).is_some() {
                            return Err(Error::TypeMismatch(format!(
                                "table `{}` declares more than one AUTOINCREMENT column",
                                table.name
                            )));
                        }
                    }
                    Constraint::PrimaryKey(columns) => {
                        if primary_key.replace(columns).is_some() {
                            return Err(Error::TypeMismatch(format!(
                                "table `{}` declares more than one PRIMARY KEY",
                                table.name
                            )));
                        }
                    }
                    _ => {}
                }
            }
            if let (Some(auto), Some(key)) = (autoincrement, primary_key) {
                if key.iter().map(String::as_str).ne([auto]) {
                    return Err(Error::TypeMismatch(format!(
                        "AUTOINCREMENT on `{}` conflicts with the PRIMARY KEY declaration",
                        auto
                    )));
                }
            }
            for constraint in &table.constraints {
                match constraint {
                    Constraint::PrimaryKey(columns) | Constraint::Unique(columns) => {
                        for name in columns {
                            require_column(table, name)?;
                        }
                    }
                    Constraint::NotNull(name) => {
                        require_column(table, name)?;
                    }
                    Constraint::AutoIncrement(name) => {
                        let def = require_column(table, name)?;
                        if def.ty.class != crate::StorageClass::Integer {
                            return Err(Error::TypeMismatch(format!(
                                "AUTOINCREMENT requires an INTEGER column, `{}` is {}",
                                name, def.ty.class
                            )));
                        }
                    }
                    Constraint::ForeignKey {
                        table: target,
                        columns,
                        references,
                    } => {
                        if columns.len() != references.len() {
                            return Err(Error::TypeMismatch(format!(
                                "foreign key on `{}` maps {} columns to {}",
                                table.name,
                                columns.len(),
                                references.len()
                            )));
                        }
                        for (local, remote) in columns.iter().zip(references) {
                            let local_def = require_column(table, local)?;
                            let remote_def = require_column(target, remote)?;
                            if Kind::of_class(local_def.ty.class)
                                != Kind::of_class(remote_def.ty.class)
                            {
                                return Err(Error::TypeMismatch(format!(
                                    "foreign key column `{}` ({}) does not match `{}.{}` ({})",
                                    local,
                                    local_def.ty.class,
                                    target.name,
                                    remote,
                                    remote_def.ty.class
                                )));
                            }
                        }
                    }
                    Constraint::Check(expr) => {
                        let table_ref = TableRef::new(table);
                        let mut scope = Scope::new();
                        scope.add(&table_ref)?;
                        check_condition(expr, &scope, "CHECK")?;
                    }
                }
            }
            Ok(())
        }
        Command::DropTable { .. } => Ok(()),
        Command::Insert {
            table,
            columns,
            values,
        } => {
            for (position, name) in columns.iter().enumerate() {
                require_column(table, name)?;
                if columns[..position].contains(name) {
                    return Err(Error::DuplicateColumn {
                        table: table.name.clone(),
                        column: name.clone(),
                    });
                }
            }
            if values.len() != columns.len() {
                return Err(Error::RowShapeMismatch {
                    expected: columns.len(),
                    found: values.len(),
                });
            }
            for (name, value) in columns.iter().zip(values.iter()) {
                let def = require_column(table, name)?;
                match value.storage_class() {
                    None => {
                        if !def.ty.nullable {
                            return Err(Error::ColumnTypeMismatch {
                                column: name.clone(),
                                expected: def.ty.class.to_string(),
                                found: "NULL".into(),
                            });
                        }
                    }
                    Some(class) => {
                        if !def.ty.class.accepts(class) {
                            return Err(Error::ColumnTypeMismatch {
                                column: name.clone(),
                                expected: def.ty.class.to_string(),
                                found: class.to_string(),
                            });
                        }
                    }
                }
            }
            Ok(())
        }
    }
}
