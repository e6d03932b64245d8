// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::fake_deps;
use wa_adapters::FakeDatabase;

#[tokio::test]
async fn replica_status_row_means_standby() {
    let db = FakeDatabase::new();
    db.on_rows(
        "SHOW REPLICA STATUS",
        vec!["Source_Host".to_string()],
        vec![vec![CellValue::Text("10.0.0.1".to_string())]],
    );

    let role = MysqlWorkload.detect_role(&db, Duration::from_secs(1)).await.unwrap();
    assert_eq!(role, DatabaseRole::Standby);
}

#[tokio::test]
async fn no_replica_status_means_primary() {
    let db = FakeDatabase::new();
    db.on_empty("SHOW REPLICA STATUS");

    let role = MysqlWorkload.detect_role(&db, Duration::from_secs(1)).await.unwrap();
    assert_eq!(role, DatabaseRole::Primary);
}

#[tokio::test]
async fn old_servers_fall_back_to_slave_status() {
    let db = FakeDatabase::new();
    db.on_error("SHOW REPLICA STATUS", "syntax error");
    db.on_rows(
        "SHOW SLAVE STATUS",
        vec!["Master_Host".to_string()],
        vec![vec![CellValue::Text("10.0.0.1".to_string())]],
    );

    let role = MysqlWorkload.detect_role(&db, Duration::from_secs(1)).await.unwrap();
    assert_eq!(role, DatabaseRole::Standby);
    assert_eq!(db.executed_statements(), vec!["SHOW REPLICA STATUS", "SHOW SLAVE STATUS"]);
}

#[tokio::test]
async fn replication_zones_resolve_dedupe_and_join() {
    let (deps, handles) = fake_deps();
    handles.db.on_rows(
        "SHOW REPLICAS",
        vec!["Server_Id".to_string(), "Host".to_string()],
        vec![
            vec![CellValue::Int(2), CellValue::Text("1.2.3.4".to_string())],
            vec![CellValue::Int(3), CellValue::Text("5.6.7.8".to_string())],
            // Same zone as the first replica: must deduplicate
            vec![CellValue::Int(4), CellValue::Text("1.2.3.5".to_string())],
        ],
    );
    handles.resolver.add_ptr("1.2.3.4", "replica-a.test-zone.c.proj.internal.");
    handles.resolver.add_ptr("5.6.7.8", "replica-b.test-zone2.c.proj.internal.");
    handles.resolver.add_ptr("1.2.3.5", "replica-c.test-zone.c.proj.internal.");

    let mut out = WorkloadMetrics::new(WorkloadType::Mysql);
    MysqlWorkload
        .augment(&handles.db, DatabaseRole::Primary, &deps, Duration::from_secs(1), &mut out)
        .await
        .unwrap();

    assert_eq!(out.get("replication_zones"), Some("test-zone,test-zone2"));
}

#[tokio::test]
async fn hostnames_resolve_forward_then_reverse() {
    let (deps, handles) = fake_deps();
    handles.db.on_rows(
        "SHOW REPLICAS",
        vec!["Host".to_string()],
        vec![vec![CellValue::Text("replica-a".to_string())]],
    );
    handles.resolver.add_host("replica-a", "1.2.3.4");
    handles.resolver.add_ptr("1.2.3.4", "replica-a.test-zone.c.proj.internal.");

    let mut out = WorkloadMetrics::new(WorkloadType::Mysql);
    MysqlWorkload
        .augment(&handles.db, DatabaseRole::Primary, &deps, Duration::from_secs(1), &mut out)
        .await
        .unwrap();

    assert_eq!(out.get("replication_zones"), Some("test-zone"));
}

#[tokio::test]
async fn unresolvable_addresses_are_skipped_not_fatal() {
    let (deps, handles) = fake_deps();
    handles.db.on_rows(
        "SHOW REPLICAS",
        vec!["Host".to_string()],
        vec![
            vec![CellValue::Text("10.9.9.9".to_string())],
            vec![CellValue::Text("1.2.3.4".to_string())],
        ],
    );
    handles.resolver.add_ptr("1.2.3.4", "replica-a.test-zone.c.proj.internal.");

    let mut out = WorkloadMetrics::new(WorkloadType::Mysql);
    MysqlWorkload
        .augment(&handles.db, DatabaseRole::Primary, &deps, Duration::from_secs(1), &mut out)
        .await
        .unwrap();

    assert_eq!(out.get("replication_zones"), Some("test-zone"));
}

#[tokio::test]
async fn standby_instances_skip_topology() {
    let (deps, handles) = fake_deps();

    let mut out = WorkloadMetrics::new(WorkloadType::Mysql);
    MysqlWorkload
        .augment(&handles.db, DatabaseRole::Standby, &deps, Duration::from_secs(1), &mut out)
        .await
        .unwrap();

    assert!(out.is_empty());
    assert!(handles.db.executed_statements().is_empty());
}

#[tokio::test]
async fn missing_topology_tables_are_not_fatal() {
    let (deps, handles) = fake_deps();
    handles.db.on_error("SHOW REPLICAS", "unknown statement");
    handles.db.on_error("SHOW SLAVE HOSTS", "unknown statement");

    let mut out = WorkloadMetrics::new(WorkloadType::Mysql);
    MysqlWorkload
        .augment(&handles.db, DatabaseRole::Primary, &deps, Duration::from_secs(1), &mut out)
        .await
        .unwrap();

    assert!(out.is_empty());
}

#[tokio::test]
async fn identity_reports_version_and_databases() {
    let db = FakeDatabase::new();
    db.on_scalar("SELECT VERSION() AS version", "version", CellValue::Text("8.0.36".to_string()));
    db.on_rows(
        "SHOW DATABASES",
        vec!["Database".to_string()],
        vec![
            vec![CellValue::Text("information_schema".to_string())],
            vec![CellValue::Text("orders".to_string())],
        ],
    );

    let identity = MysqlWorkload.discover_identity(&db, Duration::from_secs(1)).await.unwrap();
    assert_eq!(identity.version, "8.0.36");
    assert_eq!(identity.databases, vec!["information_schema", "orders"]);
}
