//! Per-request handle lifecycle.

use super::common::{empty_gateway, seeded_gateway};
use sql_playground::db::{self, Value};
use sql_playground::error::{GatewayError, OpenFailureReason};
use sql_playground::gateway::Gateway;

#[tokio::test]
async fn test_failed_query_releases_handle() {
    let (gateway, _dir) = seeded_gateway().await;

    for _ in 0..3 {
        let err = gateway
            .run_query(Some("SELEC * FROM employees"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Sql(_)));
    }

    // A leaked handle would hold a lock and block this write.
    let result = gateway
        .run_query(Some("DELETE FROM students WHERE marks < 60"))
        .await
        .unwrap();
    assert_eq!(result.as_mutation().unwrap().changes, 1);

    // Nothing is left open, so a fresh handle can take the file exclusively.
    let mut handle = db::open_for_read_write(gateway.db_path()).await.unwrap();
    sqlx::query("BEGIN EXCLUSIVE")
        .execute(&mut handle)
        .await
        .unwrap();
    sqlx::query("ROLLBACK").execute(&mut handle).await.unwrap();
    db::close_handle(handle).await;
}

#[tokio::test]
async fn test_table_not_found_releases_handle() {
    let (gateway, _dir) = seeded_gateway().await;

    let err = gateway.preview_table(Some("Students")).await.unwrap_err();
    assert!(matches!(err, GatewayError::TableNotFound(_)));

    gateway
        .run_query(Some("UPDATE students SET semester = semester + 1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let (gateway, _dir) = seeded_gateway().await;

    let mut tasks = Vec::new();
    for i in 0..8 {
        let gateway: Gateway = gateway.clone();
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                gateway
                    .run_query(Some("SELECT count(*) AS n FROM employees"))
                    .await
            } else {
                gateway.run_query(Some("SELECT * FROM nowhere")).await
            }
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        let result = task.await.unwrap();
        if i % 2 == 0 {
            let rows = result.unwrap();
            let rows = rows.as_rows().unwrap();
            assert_eq!(rows.rows[0].get("n"), Some(&Value::Int(20)));
        } else {
            assert!(matches!(result, Err(GatewayError::Sql(_))));
        }
    }
}

#[tokio::test]
async fn test_reads_see_earlier_writes() {
    let (gateway, _dir) = seeded_gateway().await;

    let (a, b) = tokio::join!(
        gateway.list_tables(),
        gateway.preview_table(Some("projects"))
    );
    assert_eq!(a.unwrap().tables.len(), 5);
    assert_eq!(b.unwrap().rows.row_count, 5);

    gateway
        .run_query(Some(
            "INSERT INTO projects (proj_id, title, budget) VALUES (6, 'Data Lake', 300000)",
        ))
        .await
        .unwrap();

    let preview = gateway.preview_table(Some("projects")).await.unwrap();
    assert_eq!(preview.rows.row_count, 6);
    assert_eq!(preview.rows.rows[5].get("start_date"), Some(&Value::Null));
}

#[tokio::test]
async fn test_corrupt_file_reports_open_failure() {
    let (gateway, _dir) = empty_gateway();
    std::fs::write(gateway.db_path(), vec![0xAB; 8192]).unwrap();

    let err = gateway.list_tables().await.unwrap_err();
    match err {
        GatewayError::StorageOpenFailure { reason, .. } => {
            assert_eq!(reason, OpenFailureReason::Corrupt)
        }
        other => panic!("Expected StorageOpenFailure, got {other:?}"),
    }

    let err = gateway.run_query(Some("SELECT 1")).await.unwrap_err();
    assert_eq!(err.kind(), "storage_open_failure");

    // Initialization recovers the file.
    gateway.initialize_storage().await.unwrap();
    assert_eq!(gateway.list_tables().await.unwrap().tables.len(), 5);
}
