//! Gateway operations against a seeded database.

use super::common::{empty_gateway, seeded_gateway, text};
use pretty_assertions::assert_eq;
use sql_playground::db::{QueryResult, Value};
use sql_playground::error::GatewayError;

const EMPLOYEE_COLUMNS: [&str; 8] = [
    "emp_id",
    "name",
    "gender",
    "salary",
    "dept_id",
    "join_date",
    "email",
    "city",
];

#[tokio::test]
async fn test_list_tables_after_init() {
    let (gateway, _dir) = seeded_gateway().await;

    let listing = gateway.list_tables().await.unwrap();
    assert_eq!(
        listing.tables,
        vec![
            "departments",
            "employee_projects",
            "employees",
            "projects",
            "students"
        ]
    );
    assert_eq!(listing.message, None);
}

#[tokio::test]
async fn test_list_tables_before_init() {
    let (gateway, _dir) = empty_gateway();

    let listing = gateway.list_tables().await.unwrap();
    assert!(listing.tables.is_empty());
    assert!(listing.message.unwrap().contains("not initialized"));
    assert!(!gateway.db_path().exists());
}

#[tokio::test]
async fn test_preview_departments() {
    let (gateway, _dir) = seeded_gateway().await;

    let preview = gateway.preview_table(Some("departments")).await.unwrap();
    assert_eq!(preview.table, "departments");
    assert_eq!(preview.rows.columns, vec!["dept_id", "dept_name"]);
    assert_eq!(preview.rows.row_count, 5);

    let names: Vec<_> = preview
        .rows
        .rows
        .iter()
        .filter_map(|r| match r.get("dept_name") {
            Some(Value::Text(name)) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        names,
        vec!["Engineering", "Sales", "Marketing", "Support", "HR"]
    );
}

#[tokio::test]
async fn test_preview_missing_table() {
    let (gateway, _dir) = seeded_gateway().await;

    let err = gateway
        .preview_table(Some("no_such_table"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::TableNotFound(name) if name == "no_such_table"));
}

#[tokio::test]
async fn test_preview_before_init() {
    let (gateway, _dir) = empty_gateway();

    let err = gateway.preview_table(Some("students")).await.unwrap_err();
    assert!(matches!(err, GatewayError::StorageNotInitialized(_)));
}

#[tokio::test]
async fn test_select_high_earners() {
    let (gateway, _dir) = seeded_gateway().await;

    let result = gateway
        .run_query(Some("SELECT * FROM employees WHERE salary > 60000"))
        .await
        .unwrap();
    assert_eq!(result.type_label(), "SELECT");

    let rows = result.as_rows().unwrap();
    assert_eq!(rows.columns, EMPLOYEE_COLUMNS);
    assert_eq!(rows.row_count, 9);
    assert!(rows
        .rows
        .iter()
        .all(|r| matches!(r.get("salary"), Some(Value::Int(salary)) if *salary > 60000)));
}

#[tokio::test]
async fn test_select_with_no_matches_keeps_columns() {
    let (gateway, _dir) = seeded_gateway().await;

    let result = gateway
        .run_query(Some("SELECT name, city FROM employees WHERE salary > 1000000"))
        .await
        .unwrap();
    let rows = result.as_rows().unwrap();
    assert_eq!(rows.columns, vec!["name", "city"]);
    assert_eq!(rows.row_count, 0);
}

#[tokio::test]
async fn test_cte_and_aggregate() {
    let (gateway, _dir) = seeded_gateway().await;

    let result = gateway
        .run_query(Some(
            "with per_dept as (select dept_id, count(*) as n from employees group by dept_id) \
             select d.dept_name, p.n from departments d join per_dept p using (dept_id) \
             order by p.n desc, d.dept_name limit 1",
        ))
        .await
        .unwrap();
    let rows = result.as_rows().unwrap();
    assert_eq!(rows.row_count, 1);
    assert_eq!(rows.rows[0].get("dept_name"), Some(&text("Engineering")));
    assert_eq!(rows.rows[0].get("n"), Some(&Value::Int(7)));
}

#[tokio::test]
async fn test_insert_then_preview() {
    let (gateway, _dir) = seeded_gateway().await;

    let result = gateway
        .run_query(Some(
            "INSERT INTO departments (dept_id, dept_name) VALUES (6, 'R&D')",
        ))
        .await
        .unwrap();
    assert_eq!(result.type_label(), "DML/DDL");

    let outcome = result.as_mutation().unwrap();
    assert_eq!(outcome.changes, 1);
    assert_eq!(outcome.last_insert_rowid, Some(6));

    let preview = gateway.preview_table(Some("departments")).await.unwrap();
    assert_eq!(preview.rows.row_count, 6);
    assert_eq!(
        preview.rows.rows[5].get("dept_name"),
        Some(&text("R&D"))
    );
}

#[tokio::test]
async fn test_ddl_shows_up_in_listing() {
    let (gateway, _dir) = seeded_gateway().await;

    let result = gateway
        .run_query(Some("CREATE TABLE audit (id INTEGER PRIMARY KEY, note TEXT)"))
        .await
        .unwrap();
    assert!(matches!(result, QueryResult::Mutation(_)));

    let listing = gateway.list_tables().await.unwrap();
    assert!(listing.tables.contains(&"audit".to_string()));

    let preview = gateway.preview_table(Some("audit")).await.unwrap();
    assert!(preview.rows.columns.is_empty());
    assert_eq!(preview.rows.row_count, 0);
}

#[tokio::test]
async fn test_destructive_statements_are_permitted() {
    let (gateway, _dir) = seeded_gateway().await;

    let result = gateway
        .run_query(Some("DELETE FROM employee_projects"))
        .await
        .unwrap();
    assert_eq!(result.as_mutation().unwrap().changes, 10);

    gateway
        .run_query(Some("DROP TABLE employee_projects"))
        .await
        .unwrap();
    let listing = gateway.list_tables().await.unwrap();
    assert_eq!(listing.tables.len(), 4);
}

#[tokio::test]
async fn test_update_reports_changes_without_rowid() {
    let (gateway, _dir) = seeded_gateway().await;

    let result = gateway
        .run_query(Some("UPDATE students SET marks = marks + 1 WHERE department = 'IT'"))
        .await
        .unwrap();
    let outcome = result.as_mutation().unwrap();
    assert_eq!(outcome.changes, 2);
    assert_eq!(outcome.last_insert_rowid, None);
}

#[tokio::test]
async fn test_sql_errors_carry_diagnostic() {
    let (gateway, _dir) = seeded_gateway().await;

    let err = gateway
        .run_query(Some("SELECT salary FROM employes"))
        .await
        .unwrap_err();
    match err {
        GatewayError::Sql(msg) => assert!(msg.contains("employes"), "{msg}"),
        other => panic!("Expected Sql error, got {other:?}"),
    }

    let err = gateway
        .run_query(Some("INSERT INTO departments (dept_id, dept_name) VALUES (1, 'Dup')"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Sql(_)));
}

#[tokio::test]
async fn test_foreign_keys_are_enforced() {
    let (gateway, _dir) = seeded_gateway().await;

    let err = gateway
        .run_query(Some(
            "INSERT INTO employees (emp_id, name, salary, dept_id) VALUES (500, 'Ghost', 1, 99)",
        ))
        .await
        .unwrap_err();
    match err {
        GatewayError::Sql(msg) => assert!(msg.contains("FOREIGN KEY"), "{msg}"),
        other => panic!("Expected Sql error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_run_query_rejects_missing_text() {
    let (gateway, _dir) = seeded_gateway().await;

    for input in [None, Some(""), Some("   ")] {
        let err = gateway.run_query(input).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)), "{input:?}");
    }
}

#[tokio::test]
async fn test_mutation_before_init_does_not_create_file() {
    let (gateway, _dir) = empty_gateway();

    let err = gateway
        .run_query(Some("CREATE TABLE t (id INTEGER)"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::StorageNotInitialized(_)));
    assert!(!gateway.db_path().exists());
}

#[tokio::test]
async fn test_multiple_statements_run_nothing() {
    let (gateway, _dir) = seeded_gateway().await;

    for sql in [
        "SELECT 1 AS a; DELETE FROM students",
        "SELECT 1 AS a; SELECT 'x' AS b, 2 AS c",
        "INSERT INTO departments VALUES (6, 'R&D'); INSERT INTO departments VALUES (7, 'Ops')",
    ] {
        let err = gateway.run_query(Some(sql)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "SQL Error: The supplied SQL string contains more than one statement",
            "{sql}"
        );
    }

    let students = gateway.preview_table(Some("students")).await.unwrap();
    assert_eq!(students.rows.row_count, 7);
    let departments = gateway.preview_table(Some("departments")).await.unwrap();
    assert_eq!(departments.rows.row_count, 5);
}

#[tokio::test]
async fn test_comment_only_text_is_sql_error() {
    let (gateway, _dir) = seeded_gateway().await;

    let err = gateway.run_query(Some("-- nothing here")).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "SQL Error: The supplied SQL string contains no statements"
    );
}

#[tokio::test]
async fn test_ddl_reports_zero_changes() {
    let (gateway, _dir) = seeded_gateway().await;

    let result = gateway
        .run_query(Some("CREATE INDEX idx_employees_city ON employees(city)"))
        .await
        .unwrap();
    let outcome = result.as_mutation().unwrap();
    assert_eq!(outcome.changes, 0);
    assert_eq!(outcome.last_insert_rowid, None);
}
