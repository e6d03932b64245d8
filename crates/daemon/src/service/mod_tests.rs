// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{fake_deps, FakeHandles};
use wa_core::{ColumnSpec, MetricType, ValueType};

use wa_adapters::FakeProcess;

fn one_gauge_query() -> Query {
    Query {
        name: "one".to_string(),
        sql: "SELECT 1 AS one".to_string(),
        database_role: DatabaseRole::Both,
        columns: vec![ColumnSpec {
            source_name: "one".to_string(),
            output_name: None,
            metric_type: MetricType::Gauge,
            value_type: ValueType::Int64,
            normalize: wa_core::Normalize::None,
        }],
    }
}

fn ticking_config(enabled: Enablement) -> WorkloadConfig {
    let mut config = WorkloadConfig::default();
    config.enabled = enabled;
    config.discovery.enabled = false;
    config.metrics.collection_frequency = Duration::from_millis(50);
    config.metrics.query_timeout = Duration::from_secs(1);
    config.metrics.queries = vec![one_gauge_query()];
    config
}

/// Canned responses for a healthy primary MySQL tick.
fn prime_mysql(handles: &FakeHandles) {
    handles.db.on_empty("SHOW REPLICA STATUS");
    handles.db.on_scalar("SELECT 1 AS one", "one", CellValue::Int(1));
    handles.db.on_empty("SHOW REPLICAS");
    handles.db.on_empty("SHOW SLAVE HOSTS");
}

fn snapshot(names: &[&str]) -> DiscoveryMessage {
    let processes = names
        .iter()
        .enumerate()
        .map(|(i, n)| Arc::new(FakeProcess::named(i as u32 + 100, n)) as Arc<dyn ProcessHandle>)
        .collect();
    DiscoveryMessage { origin: wa_core::DiscoveryOrigin::ProcessDiscovery, processes }
}

struct Harness {
    service: WorkloadService<MysqlWorkload>,
    tx: mpsc::Sender<DiscoveryMessage>,
    handles: FakeHandles,
}

fn harness(enabled: Enablement) -> Harness {
    let (deps, handles) = fake_deps();
    let (tx, rx) = mpsc::channel(1);
    let service = WorkloadService::new(MysqlWorkload, ticking_config(enabled), deps, rx);
    Harness { service, tx, handles }
}

#[tokio::test(start_paused = true)]
async fn disabled_service_emits_nothing_ever() {
    let h = harness(Enablement::Disabled);
    prime_mysql(&h.handles);

    h.service.start(CancellationToken::new()).await.unwrap();

    assert!(h.handles.insights.recorded().is_empty());
    assert!(h.handles.db.executed_statements().is_empty());
}

#[tokio::test(start_paused = true)]
async fn auto_service_without_matching_process_never_ticks() {
    let h = harness(Enablement::Auto);
    prime_mysql(&h.handles);
    let ctx = CancellationToken::new();

    let service = h.service.clone();
    let token = ctx.clone();
    let run = tokio::spawn(async move { service.start(token).await });

    h.tx.send(snapshot(&["postgres", "redis-server"])).await.unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    ctx.cancel();
    run.await.unwrap().unwrap();

    assert!(h.handles.insights.recorded().is_empty());
    assert!(h.handles.db.executed_statements().is_empty());
}

#[tokio::test(start_paused = true)]
async fn auto_service_activates_on_process_presence() {
    let h = harness(Enablement::Auto);
    prime_mysql(&h.handles);
    let ctx = CancellationToken::new();

    let service = h.service.clone();
    let token = ctx.clone();
    let run = tokio::spawn(async move { service.start(token).await });

    h.tx.send(snapshot(&["init", "mysqld"])).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    ctx.cancel();
    run.await.unwrap().unwrap();

    let recorded = h.handles.insights.recorded();
    assert!(!recorded.is_empty(), "an activated service must tick");
    assert_eq!(recorded[0].validation.workload_type, "WORKLOAD_TYPE_MYSQL");
    assert_eq!(
        recorded[0].validation.validation_details.get("one").map(String::as_str),
        Some("1")
    );
}

#[tokio::test(start_paused = true)]
async fn enabled_service_ticks_without_any_snapshot() {
    let h = harness(Enablement::Enabled);
    prime_mysql(&h.handles);
    let ctx = CancellationToken::new();

    let service = h.service.clone();
    let token = ctx.clone();
    let run = tokio::spawn(async move { service.start(token).await });

    tokio::time::sleep(Duration::from_millis(500)).await;
    ctx.cancel();
    run.await.unwrap().unwrap();

    assert!(!h.handles.insights.recorded().is_empty());
}

#[tokio::test(start_paused = true)]
async fn shipping_failure_does_not_stop_the_loop() {
    let h = harness(Enablement::Enabled);
    prime_mysql(&h.handles);
    h.handles.insights.fail_next(1);
    let ctx = CancellationToken::new();

    let service = h.service.clone();
    let token = ctx.clone();
    let run = tokio::spawn(async move { service.start(token).await });

    tokio::time::sleep(Duration::from_millis(500)).await;
    ctx.cancel();
    run.await.unwrap().unwrap();

    assert!(
        !h.handles.insights.recorded().is_empty(),
        "later ticks must deliver after a failed one"
    );
    assert!(h.handles.usage.error_count(ErrorCode::InsightWrite) >= 1);
}

#[tokio::test(start_paused = true)]
async fn secret_reference_resolves_password() {
    let (deps, handles) = fake_deps();
    handles.secrets.store("test-project", "mysql-password", "hunter2");
    prime_mysql(&handles);

    let mut config = ticking_config(Enablement::Enabled);
    config.connection.secret = Some(wa_config::SecretRef {
        project_id: "test-project".to_string(),
        secret_name: "mysql-password".to_string(),
    });

    let (_tx, rx) = mpsc::channel(1);
    let service = WorkloadService::new(MysqlWorkload, config, deps, rx);
    let ctx = CancellationToken::new();

    let runner = service.clone();
    let token = ctx.clone();
    let run = tokio::spawn(async move { runner.start(token).await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    ctx.cancel();
    run.await.unwrap().unwrap();

    assert_eq!(
        handles.secrets.accesses.lock().first(),
        Some(&("test-project".to_string(), "mysql-password".to_string()))
    );
    assert!(!handles.insights.recorded().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_secret_fetch_skips_the_tick() {
    let (deps, handles) = fake_deps();
    prime_mysql(&handles);

    let mut config = ticking_config(Enablement::Enabled);
    config.connection.secret = Some(wa_config::SecretRef {
        project_id: "test-project".to_string(),
        secret_name: "absent".to_string(),
    });

    let (_tx, rx) = mpsc::channel(1);
    let service = WorkloadService::new(MysqlWorkload, config, deps, rx);
    let ctx = CancellationToken::new();

    let runner = service.clone();
    let token = ctx.clone();
    let run = tokio::spawn(async move { runner.start(token).await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    ctx.cancel();
    run.await.unwrap().unwrap();

    assert!(handles.insights.recorded().is_empty());
    assert!(handles.usage.error_count(ErrorCode::SecretFetch) >= 1);
}

#[tokio::test(start_paused = true)]
async fn partial_secret_reference_is_treated_as_absent() {
    let (deps, handles) = fake_deps();
    prime_mysql(&handles);

    let mut config = ticking_config(Enablement::Enabled);
    config.connection.secret = Some(wa_config::SecretRef {
        project_id: String::new(),
        secret_name: "mysql-password".to_string(),
    });

    let (_tx, rx) = mpsc::channel(1);
    let service = WorkloadService::new(MysqlWorkload, config, deps, rx);
    let ctx = CancellationToken::new();

    let runner = service.clone();
    let token = ctx.clone();
    let run = tokio::spawn(async move { runner.start(token).await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    ctx.cancel();
    run.await.unwrap().unwrap();

    assert!(handles.secrets.accesses.lock().is_empty(), "partial refs must not be fetched");
    assert!(!handles.insights.recorded().is_empty(), "service falls back to empty password");
}

#[tokio::test(start_paused = true)]
async fn ping_failure_retries_next_tick() {
    let h = harness(Enablement::Enabled);
    prime_mysql(&h.handles);
    h.handles.db.fail_pings(1);
    let ctx = CancellationToken::new();

    let service = h.service.clone();
    let token = ctx.clone();
    let run = tokio::spawn(async move { service.start(token).await });
    tokio::time::sleep(Duration::from_millis(500)).await;
    ctx.cancel();
    run.await.unwrap().unwrap();

    assert!(h.handles.usage.error_count(ErrorCode::DatabaseConnection) >= 1);
    assert!(!h.handles.insights.recorded().is_empty(), "second tick reconnects");
}

#[tokio::test(start_paused = true)]
async fn failed_identity_discovery_surfaces_to_the_wrapper() {
    let (deps, handles) = fake_deps();
    handles.db.on_error("SELECT VERSION() AS version", "broken catalog");

    let mut config = ticking_config(Enablement::Enabled);
    config.discovery.enabled = true;
    config.discovery.update_frequency = Duration::from_millis(50);
    config.metrics.enabled = false;

    let (tx, rx) = mpsc::channel(1);
    let service = WorkloadService::new(MysqlWorkload, config, deps, rx);
    let ctx = CancellationToken::new();

    let runner = service.clone();
    let token = ctx.clone();
    let run = tokio::spawn(async move { runner.start(token).await });

    // The discovery loop starts its ticker once a snapshot has landed.
    tx.send(snapshot(&["mysqld"])).await.unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;

    let result = run.await.unwrap();
    assert!(
        matches!(result, Err(ServiceError::Discovery(_))),
        "identity rebuild failure must surface through the service error"
    );
    ctx.cancel();
}

struct UnsupportedWorkload;

#[async_trait]
impl Workload for UnsupportedWorkload {
    fn workload_type(&self) -> WorkloadType {
        WorkloadType::Oracle
    }

    fn process_prefixes(&self) -> &'static [&'static str] {
        &["ora_pmon_"]
    }

    fn platform_supported(&self) -> bool {
        false
    }

    async fn detect_role(
        &self,
        _conn: &dyn DatabaseConnection,
        _timeout: Duration,
    ) -> Result<DatabaseRole, ServiceError> {
        Ok(DatabaseRole::Primary)
    }

    async fn discover_identity(
        &self,
        _conn: &dyn DatabaseConnection,
        _timeout: Duration,
    ) -> Result<DatabaseIdentity, ServiceError> {
        Ok(DatabaseIdentity::default())
    }
}

#[tokio::test(start_paused = true)]
async fn unsupported_platform_refuses_to_activate() {
    let (deps, handles) = fake_deps();
    let (_tx, rx) = mpsc::channel(1);
    let service =
        WorkloadService::new(UnsupportedWorkload, ticking_config(Enablement::Enabled), deps, rx);

    service.start(CancellationToken::new()).await.unwrap();

    assert_eq!(handles.usage.error_count(ErrorCode::OracleService), 1);
    assert!(handles.db.executed_statements().is_empty(), "no tick may ever fire");
    assert!(handles.insights.recorded().is_empty());
}

#[tokio::test(start_paused = true)]
async fn override_file_ships_as_parallel_stream() {
    let h = harness(Enablement::Enabled);
    prime_mysql(&h.handles);
    std::fs::write(
        h.handles.dir.path().join("metricoverride.yaml"),
        "workload_type: POSTGRES\nwork_mem: 80MB\n",
    )
    .unwrap();
    let ctx = CancellationToken::new();

    let service = h.service.clone();
    let token = ctx.clone();
    let run = tokio::spawn(async move { service.start(token).await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    ctx.cancel();
    run.await.unwrap().unwrap();

    let recorded = h.handles.insights.recorded();
    assert!(
        recorded.iter().any(|r| r.validation.workload_type == "WORKLOAD_TYPE_MYSQL"),
        "live collection keeps flowing"
    );
    assert!(
        recorded.iter().any(|r| r.validation.workload_type == "WORKLOAD_TYPE_POSTGRES"
            && r.validation.validation_details.get("work_mem").map(String::as_str)
                == Some("80MB")),
        "override batches ship alongside"
    );
}

#[yare::parameterized(
    matching    = { "mysqld",      true },
    versioned   = { "mysqld-8.0",  true },
    unrelated   = { "postgres",    false },
    substring   = { "libmysqld",   false },
)]
fn prefix_matching(name: &str, expected: bool) {
    let h = harness(Enablement::Auto);
    assert_eq!(h.service.matches_prefix(name), expected);
}
