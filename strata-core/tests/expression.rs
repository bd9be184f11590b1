#[cfg(test)]
mod tests {
    use strata_core::{
        ColumnDef, ColumnType, Error, Expr, GenericSqlWriter, Placeholders, SqlWriter,
        StorageClass, Table, TableDef, TableRef, Value,
    };

    const WRITER: GenericSqlWriter = GenericSqlWriter::new();

    fn products() -> Table {
        TableDef::new(
            "Products",
            [
                ColumnDef::new("id", ColumnType::new(StorageClass::Integer)),
                ColumnDef::new("name", ColumnType::new(StorageClass::Text)),
                ColumnDef::new("price", ColumnType::new(StorageClass::Real)),
                ColumnDef::new("stock", ColumnType::nullable(StorageClass::Integer)),
            ],
        )
        .unwrap()
        .shared()
    }

    fn render(expr: &Expr) -> (String, Vec<Value>) {
        let mut out = String::new();
        let mut params = Vec::new();
        WRITER.write_expression(&mut out, &mut Placeholders::Bind(&mut params), expr);
        (out, params)
    }

    #[test]
    fn comparison_requires_matching_kinds() {
        let table = products();
        let p = TableRef::new(&table);
        let ok = p.col("price").unwrap().gt(Expr::value(10).unwrap());
        assert!(ok.is_ok());
        let bad = p.col("name").unwrap().gt(Expr::value(10).unwrap());
        assert!(matches!(bad, Err(Error::TypeMismatch(..))));
    }

    #[test]
    fn null_compares_with_anything() {
        let table = products();
        let p = TableRef::new(&table);
        assert!(p.col("name").unwrap().eq(Expr::null()).is_ok());
        assert!(p.col("price").unwrap().ne(Expr::null()).is_ok());
    }

    #[test]
    fn logical_operators_require_booleans() {
        let table = products();
        let p = TableRef::new(&table);
        let condition = p.col("price").unwrap().gt(Expr::value(1.0).unwrap()).unwrap();
        assert!(condition.clone().and(p.col("stock").unwrap().eq(Expr::null()).unwrap()).is_ok());
        let bad = condition.and(p.col("price").unwrap());
        assert!(matches!(bad, Err(Error::TypeMismatch(..))));
        let bad = p.col("name").unwrap().not();
        assert!(matches!(bad, Err(Error::TypeMismatch(..))));
    }

    #[test]
    fn like_requires_text() {
        let table = products();
        let p = TableRef::new(&table);
        assert!(p.col("name").unwrap().like(Expr::value("a%").unwrap()).is_ok());
        let bad = p.col("price").unwrap().like(Expr::value("a%").unwrap());
        assert!(matches!(bad, Err(Error::TypeMismatch(..))));
    }

    #[test]
    fn arithmetic_requires_numbers_and_widens() {
        let table = products();
        let p = TableRef::new(&table);
        let sum = p.col("price").unwrap().add(p.col("stock").unwrap()).unwrap();
        assert_eq!(
            sum.result_type(),
            ColumnType {
                class: StorageClass::Real,
                nullable: true,
            }
        );
        let ints = p.col("id").unwrap().mul(p.col("id").unwrap()).unwrap();
        assert_eq!(ints.result_type(), ColumnType::new(StorageClass::Integer));
        let bad = p.col("name").unwrap().add(Expr::value(1).unwrap());
        assert!(matches!(bad, Err(Error::TypeMismatch(..))));
    }

    #[test]
    fn aggregates_type_check() {
        let table = products();
        let p = TableRef::new(&table);
        let avg = p.col("price").unwrap().avg().unwrap();
        assert_eq!(avg.result_type(), ColumnType::nullable(StorageClass::Real));
        let sum = p.col("stock").unwrap().sum().unwrap();
        assert_eq!(
            sum.result_type(),
            ColumnType {
                class: StorageClass::Integer,
                nullable: true,
            }
        );
        // COUNT accepts any argument, including text.
        let count = p.col("name").unwrap().count();
        assert_eq!(count.result_type(), ColumnType::new(StorageClass::Integer));
        let bad = p.col("name").unwrap().min();
        assert!(matches!(bad, Err(Error::TypeMismatch(..))));
    }

    #[test]
    fn literals_render_as_placeholders() {
        let table = products();
        let p = TableRef::new(&table);
        let expr = p
            .col("price")
            .unwrap()
            .ge(Expr::value(9.99).unwrap())
            .unwrap();
        let (sql, params) = render(&expr);
        assert_eq!(sql, r#""Products"."price" >= ?"#);
        assert_eq!(params, vec![Value::Real(Some(9.99))]);
    }

    #[test]
    fn precedence_parenthesizes_only_when_needed() {
        let table = products();
        let p = TableRef::new(&table);
        let price = || p.col("price").unwrap();
        let stock = || p.col("stock").unwrap();

        // Multiplication binds tighter than addition: no parentheses.
        let expr = price().add(stock().mul(Expr::value(2).unwrap()).unwrap()).unwrap();
        let (sql, _) = render(&expr);
        assert_eq!(
            sql,
            r#""Products"."price" + "Products"."stock" * ?"#
        );

        // Addition under multiplication needs them.
        let expr = price().add(stock()).unwrap().mul(Expr::value(2).unwrap()).unwrap();
        let (sql, _) = render(&expr);
        assert_eq!(
            sql,
            r#"("Products"."price" + "Products"."stock") * ?"#
        );

        // OR under AND needs them, AND under OR does not.
        let low = || price().lt(Expr::value(1.0).unwrap()).unwrap();
        let high = || price().gt(Expr::value(9.0).unwrap()).unwrap();
        let empty = || stock().eq(Expr::value(0).unwrap()).unwrap();
        let expr = low().or(high()).unwrap().and(empty()).unwrap();
        let (sql, _) = render(&expr);
        assert_eq!(
            sql,
            r#"("Products"."price" < ? OR "Products"."price" > ?) AND "Products"."stock" = ?"#
        );
    }

    #[test]
    fn same_precedence_right_side_parenthesizes() {
        let table = products();
        let p = TableRef::new(&table);
        let price = || p.col("price").unwrap();
        let expr = price().sub(price().sub(price()).unwrap()).unwrap();
        let (sql, _) = render(&expr);
        assert_eq!(
            sql,
            r#""Products"."price" - ("Products"."price" - "Products"."price")"#
        );
    }

    #[test]
    fn unary_operators_render() {
        let table = products();
        let p = TableRef::new(&table);
        let expr = p.col("price").unwrap().neg().unwrap();
        let (sql, _) = render(&expr);
        assert_eq!(sql, r#"-"Products"."price""#);

        let expr = p
            .col("stock")
            .unwrap()
            .eq(Expr::value(0).unwrap())
            .unwrap()
            .not()
            .unwrap();
        // NOT binds looser than the comparison, so no parentheses needed.
        let (sql, _) = render(&expr);
        assert_eq!(sql, r#"NOT "Products"."stock" = ?"#);
    }

    #[test]
    fn count_star_renders() {
        let (sql, params) = render(&Expr::count_all());
        assert_eq!(sql, "COUNT(*)");
        assert!(params.is_empty());
    }

    #[test]
    fn check_literals_render_inline() {
        let table = products();
        let p = TableRef::new(&table);
        let expr = p
            .col("price")
            .unwrap()
            .gt(Expr::value(0.0).unwrap())
            .unwrap();
        let mut out = String::new();
        WRITER.write_expression(&mut out, &mut Placeholders::Inline, &expr);
        assert_eq!(out, r#""Products"."price" > 0.0"#);
    }
}
