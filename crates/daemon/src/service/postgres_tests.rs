// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wa_adapters::{CellValue, FakeDatabase};

#[yare::parameterized(
    bool_false = { CellValue::Bool(false),              DatabaseRole::Primary },
    bool_true  = { CellValue::Bool(true),               DatabaseRole::Standby },
    text_f     = { CellValue::Text("f".to_string()),    DatabaseRole::Primary },
    text_t     = { CellValue::Text("t".to_string()),    DatabaseRole::Standby },
)]
fn recovery_flag_maps_to_role(cell: CellValue, expected: DatabaseRole) {
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    rt.block_on(async {
        let db = FakeDatabase::new();
        db.on_scalar("SELECT pg_is_in_recovery() AS in_recovery", "in_recovery", cell);
        let role = PostgresWorkload.detect_role(&db, Duration::from_secs(1)).await.unwrap();
        assert_eq!(role, expected);
    });
}

#[tokio::test]
async fn role_probe_failure_propagates() {
    let db = FakeDatabase::new();
    db.on_error("SELECT pg_is_in_recovery() AS in_recovery", "connection reset");

    let err = PostgresWorkload.detect_role(&db, Duration::from_secs(1)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Query { .. }));
}

#[tokio::test]
async fn identity_lists_non_template_databases() {
    let db = FakeDatabase::new();
    db.on_scalar("SHOW server_version", "server_version", CellValue::Text("15.4".to_string()));
    db.on_rows(
        "SELECT datname FROM pg_database WHERE datistemplate = false",
        vec!["datname".to_string()],
        vec![
            vec![CellValue::Text("postgres".to_string())],
            vec![CellValue::Text("inventory".to_string())],
        ],
    );

    let identity =
        PostgresWorkload.discover_identity(&db, Duration::from_secs(1)).await.unwrap();
    assert_eq!(identity.version, "15.4");
    assert_eq!(identity.databases, vec!["postgres", "inventory"]);
}
