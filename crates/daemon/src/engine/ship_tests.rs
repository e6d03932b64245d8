// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::fake_deps;
use std::collections::BTreeMap;
use wa_core::{MetricType, MetricValue, WorkloadMetrics};

fn batch(workload: WorkloadType, key: &str, value: &str) -> WorkloadMetrics {
    let mut batch = WorkloadMetrics::new(workload);
    batch.insert(key, value);
    batch
}

#[tokio::test]
async fn each_batch_ships_in_its_own_request() {
    let (deps, handles) = fake_deps();

    let batches = vec![
        batch(WorkloadType::Postgres, "work_mem", "83886080"),
        batch(WorkloadType::Mysql, "max_connections", "151"),
    ];
    ship_insights(&deps, batches).await.unwrap();

    let recorded = handles.insights.recorded();
    assert_eq!(recorded.len(), 2);
    let mut kinds: Vec<String> =
        recorded.iter().map(|r| r.validation.workload_type.clone()).collect();
    kinds.sort();
    assert_eq!(kinds, vec!["WORKLOAD_TYPE_MYSQL", "WORKLOAD_TYPE_POSTGRES"]);
    assert!(recorded.iter().all(|r| r.instance_id == "1234567890"));
}

#[tokio::test]
async fn empty_batches_are_not_shipped() {
    let (deps, handles) = fake_deps();
    ship_insights(&deps, vec![WorkloadMetrics::new(WorkloadType::Redis)]).await.unwrap();
    assert!(handles.insights.recorded().is_empty());
}

#[tokio::test]
async fn one_failed_batch_fails_the_tick_but_not_the_rest() {
    let (deps, handles) = fake_deps();
    handles.insights.fail_next(1);

    let batches = vec![
        batch(WorkloadType::Postgres, "a", "1"),
        batch(WorkloadType::Mysql, "b", "2"),
    ];
    let result = ship_insights(&deps, batches).await;

    assert!(matches!(result, Err(ServiceError::Insight { failed: 1 })));
    assert_eq!(handles.insights.recorded().len(), 1, "the surviving batch still ships");
}

#[tokio::test]
async fn points_forward_cumulative_values_untouched() {
    let (deps, handles) = fake_deps();

    let points = vec![MetricPoint {
        key: "questions".to_string(),
        kind: MetricType::Cumulative,
        value: MetricValue::Int(90_210),
        labels: BTreeMap::new(),
    }];
    ship_points(&deps, WorkloadType::Mysql, points.clone()).await.unwrap();

    assert_eq!(handles.timeseries.points_for(WorkloadType::Mysql), points);
}

#[tokio::test]
async fn no_points_means_no_write() {
    let (deps, handles) = fake_deps();
    ship_points(&deps, WorkloadType::Mysql, vec![]).await.unwrap();
    assert!(handles.timeseries.shipped.lock().is_empty());
}
