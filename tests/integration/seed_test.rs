//! Storage initialization contents.

use super::common::{empty_gateway, seeded_gateway, text};
use pretty_assertions::assert_eq;
use sql_playground::db::seed::SEEDED_TABLES;
use sql_playground::db::Value;

#[tokio::test]
async fn test_reinitialize_restores_reference_data() {
    let (gateway, _dir) = seeded_gateway().await;

    gateway.run_query(Some("DELETE FROM students")).await.unwrap();
    gateway
        .run_query(Some("CREATE TABLE scratch (x INTEGER)"))
        .await
        .unwrap();

    let report = gateway.initialize_storage().await.unwrap();
    assert_eq!(report.count("students"), Some(7));

    let listing = gateway.list_tables().await.unwrap();
    assert!(!listing.tables.contains(&"scratch".to_string()));
}

#[tokio::test]
async fn test_repeated_initialization_gives_same_report() {
    let (gateway, _dir) = empty_gateway();

    let first = gateway.initialize_storage().await.unwrap();
    let second = gateway.initialize_storage().await.unwrap();
    assert_eq!(first, second);

    let tables: Vec<_> = first.row_counts.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(tables, SEEDED_TABLES);
}

#[tokio::test]
async fn test_seeded_contents() {
    let (gateway, _dir) = seeded_gateway().await;

    let result = gateway
        .run_query(Some(
            "SELECT e.name, p.title, ep.role FROM employee_projects ep \
             JOIN employees e ON e.emp_id = ep.emp_id \
             JOIN projects p ON p.proj_id = ep.proj_id \
             WHERE ep.id = 3",
        ))
        .await
        .unwrap();
    let rows = result.as_rows().unwrap();
    assert_eq!(rows.row_count, 1);
    assert_eq!(rows.rows[0].get("name"), Some(&text("Vikram Rao")));
    assert_eq!(rows.rows[0].get("title"), Some(&text("Cloud Migration")));
    assert_eq!(rows.rows[0].get("role"), Some(&text("Architect")));

    let result = gateway
        .run_query(Some("SELECT name FROM students ORDER BY marks DESC LIMIT 1"))
        .await
        .unwrap();
    assert_eq!(
        result.as_rows().unwrap().rows[0].get("name"),
        Some(&text("Sunita"))
    );
}

#[tokio::test]
async fn test_employee_column_types() {
    let (gateway, _dir) = seeded_gateway().await;

    let preview = gateway.preview_table(Some("employees")).await.unwrap();
    let first = &preview.rows.rows[0];
    assert_eq!(first.get("emp_id"), Some(&Value::Int(101)));
    assert_eq!(first.get("salary"), Some(&Value::Int(60000)));
    assert_eq!(first.get("city"), Some(&text("Pune")));
    assert_eq!(preview.rows.row_count, 20);
}
