#[cfg(test)]
mod tests {
    use strata::{
        AsValue, ColumnDef, ColumnType, Command, Connection, Error, Executor, Expr, Query, Record,
        Result, Row, RowLabeled, Select, StorageClass, Table, TableDef, TableRef, Value,
    };
    use strata_memory::MemoryConnection;

    fn employees() -> Table {
        TableDef::new(
            "Employees",
            [
                ColumnDef::new("name", ColumnType::new(StorageClass::Text)),
                ColumnDef::new("salary", ColumnType::new(StorageClass::Real)),
            ],
        )
        .unwrap()
        .shared()
    }

    fn salary_query(table: &Table) -> Result<Query> {
        let e = TableRef::new(table);
        Select::from(e.clone())
            .column(e.col("name")?)
            .column(e.col("salary")?)
            .filter(e.col("salary")?.gt(Expr::value(3000.0)?)?)
            .finish()
    }

    #[derive(Debug, PartialEq)]
    struct Employee {
        name: String,
        salary: f64,
    }

    fn field(row: &RowLabeled, name: &str) -> Result<Value> {
        row.get_column(name)
            .cloned()
            .ok_or_else(|| Error::DecodingError(format!("missing column `{}`", name)))
    }

    impl Record for Employee {
        const COLUMNS: &'static [&'static str] = &["name", "salary"];

        fn to_row(&self) -> Result<Row> {
            Ok(vec![self.name.clone().as_value()?, self.salary.as_value()?].into_boxed_slice())
        }

        fn from_row(row: &RowLabeled) -> Result<Self> {
            row.expect_arity(Self::COLUMNS.len())?;
            Ok(Self {
                name: String::try_from_value(field(row, "name")?)?,
                salary: f64::try_from_value(field(row, "salary")?)?,
            })
        }
    }

    #[test]
    fn execute_records_statements_and_reports_effects() -> Result<()> {
        let table = employees();
        let mut connection = MemoryConnection::new();
        let mut executor = Executor::new(&mut connection);

        let affected = executor.execute(&Command::create_table(&table)?)?;
        assert_eq!(affected.rows_affected, 1);
        assert_eq!(affected.last_affected_id, None);

        let ada = Employee {
            name: "Ada".to_owned(),
            salary: 4200.0,
        };
        let insert = Command::insert(&table, Employee::COLUMNS.iter().copied(), ada.to_row()?)?;
        let affected = executor.execute(&insert)?;
        assert_eq!(affected.rows_affected, 1);
        assert_eq!(affected.last_affected_id, Some(1));

        let sql = connection.committed_sql();
        assert_eq!(sql.len(), 2);
        assert!(sql[0].starts_with("CREATE TABLE \"Employees\""));
        assert_eq!(
            sql[1],
            r#"INSERT INTO "Employees" ("name", "salary") VALUES (?, ?);"#
        );
        let committed = connection.committed();
        assert_eq!(
            committed[1].1,
            vec![
                Value::Text(Some("Ada".into())),
                Value::Real(Some(4200.0)),
            ]
        );
        Ok(())
    }

    #[test]
    fn fetch_binds_parameters_and_returns_scripted_rows() -> Result<()> {
        let table = employees();
        let mut connection = MemoryConnection::new();
        connection.push_rows(
            &["name", "salary"],
            vec![
                vec![Value::Text(Some("Ada".into())), Value::Real(Some(4200.0))],
                vec![Value::Text(Some("Grace".into())), Value::Real(Some(5100.0))],
            ],
        );

        let query = salary_query(&table)?;
        let mut executor = Executor::new(&mut connection);
        let rows = executor.fetch(&query, 100)?;
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get_column("name"),
            Some(&Value::Text(Some("Ada".into())))
        );

        // The single placeholder carried the filter threshold.
        let committed = connection.committed();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].1, vec![Value::Real(Some(3000.0))]);
        Ok(())
    }

    #[test]
    fn fetch_limit_truncates_without_error() -> Result<()> {
        let table = employees();
        let mut connection = MemoryConnection::new();
        connection.push_rows(
            &["name", "salary"],
            vec![
                vec![Value::Text(Some("Ada".into())), Value::Real(Some(4200.0))],
                vec![Value::Text(Some("Grace".into())), Value::Real(Some(5100.0))],
                vec![Value::Text(Some("Edith".into())), Value::Real(Some(3900.0))],
            ],
        );

        let query = salary_query(&table)?;
        let mut executor = Executor::new(&mut connection);
        let rows = executor.fetch(&query, 2)?;
        assert_eq!(rows.len(), 2);
        Ok(())
    }

    #[test]
    fn fetch_as_marshals_typed_records() -> Result<()> {
        let table = employees();
        let mut connection = MemoryConnection::new();
        connection.push_rows(
            &["name", "salary"],
            vec![vec![
                Value::Text(Some("Ada".into())),
                Value::Real(Some(4200.0)),
            ]],
        );

        let query = salary_query(&table)?;
        let mut executor = Executor::new(&mut connection);
        let people: Vec<Employee> = executor.fetch_as(&query, 100)?;
        assert_eq!(
            people,
            vec![Employee {
                name: "Ada".to_owned(),
                salary: 4200.0,
            }]
        );
        Ok(())
    }

    #[test]
    fn record_round_trip() -> Result<()> {
        let ada = Employee {
            name: "Ada".to_owned(),
            salary: 4200.0,
        };
        let labels = Employee::COLUMNS
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into();
        let row = RowLabeled::new(labels, ada.to_row()?);
        assert_eq!(Employee::from_row(&row)?, ada);
        Ok(())
    }

    #[test]
    fn record_rejects_wrong_arity() {
        let labels: strata::RowNames = vec!["name".to_owned()].into();
        let row = RowLabeled::new(labels, vec![Value::Text(Some("Ada".into()))].into_boxed_slice());
        assert_eq!(
            Employee::from_row(&row).unwrap_err(),
            Error::RowShapeMismatch {
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn transaction_commits_all_or_nothing() -> Result<()> {
        let table = employees();
        let commands = vec![
            Command::create_table(&table)?,
            Command::insert_values(&table, ["name"], ["Ada"])?,
            Command::insert_values(&table, ["name"], ["Grace"])?,
        ];

        let mut connection = MemoryConnection::new();
        let mut executor = Executor::new(&mut connection);
        let affected = executor.exec_in_transaction(&commands)?;
        assert_eq!(affected.rows_affected, 3);
        assert_eq!(connection.committed_sql().len(), 3);
        Ok(())
    }

    #[test]
    fn transaction_rolls_back_on_failure() -> Result<()> {
        let table = employees();
        let commands = vec![
            Command::create_table(&table)?,
            Command::insert_values(&table, ["name"], ["Ada"])?,
        ];

        let mut connection = MemoryConnection::new();
        connection.fail_when("INSERT", 19, "constraint violated");
        let mut executor = Executor::new(&mut connection);
        let result = executor.exec_in_transaction(&commands);
        assert_eq!(result.unwrap_err(), Error::driver(19, "constraint violated"));

        // The CREATE TABLE that succeeded inside the transaction is gone too.
        assert!(connection.committed_sql().is_empty());
        Ok(())
    }

    #[test]
    fn driver_failure_surfaces_outside_transactions() -> Result<()> {
        let table = employees();
        let mut connection = MemoryConnection::new();
        connection.fail_when("DROP", 5, "database is locked");
        let mut executor = Executor::new(&mut connection);

        let result = executor.execute(&Command::drop_table(&table, false));
        assert_eq!(result.unwrap_err(), Error::driver(5, "database is locked"));
        assert!(connection.committed_sql().is_empty());

        connection.clear_failure();
        let mut executor = Executor::new(&mut connection);
        executor.execute(&Command::drop_table(&table, false))?;
        assert_eq!(connection.committed_sql(), vec![r#"DROP TABLE "Employees";"#]);
        Ok(())
    }

    #[test]
    fn nested_begin_is_rejected() {
        let mut connection = MemoryConnection::new();
        connection.begin().unwrap();
        assert!(connection.begin().is_err());
        connection.rollback().unwrap();
        assert!(connection.rollback().is_err());
    }
}
