// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery of collected metrics to the cloud back-ends.

use std::sync::Arc;

use tracing::warn;
use wa_adapters::WriteInsightRequest;
use wa_core::{MetricPoint, WorkloadMetrics, WorkloadType};

use crate::error::ServiceError;
use crate::service::ServiceDeps;

/// Ship each batch in its own task and join them all before returning.
/// Any failed batch makes the tick report an error; successful batches
/// are still delivered.
pub(crate) async fn ship_insights(
    deps: &ServiceDeps,
    batches: Vec<WorkloadMetrics>,
) -> Result<(), ServiceError> {
    let batches: Vec<WorkloadMetrics> =
        batches.into_iter().filter(|batch| !batch.is_empty()).collect();
    if batches.is_empty() {
        return Ok(());
    }

    let mut tasks = Vec::with_capacity(batches.len());
    for batch in batches {
        let client = Arc::clone(&deps.insights);
        let request = WriteInsightRequest::from_batch(&deps.cloud, &batch);
        tasks.push(tokio::spawn(async move { client.write_insight(request).await }));
    }

    let mut failed = 0usize;
    for task in tasks {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "insight write failed");
                failed += 1;
            }
            Err(e) => {
                warn!(error = %e, "insight task did not complete");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        Err(ServiceError::Insight { failed })
    } else {
        Ok(())
    }
}

/// Forward the tick's points to the time-series endpoint. Cumulative
/// values pass through untouched.
pub(crate) async fn ship_points(
    deps: &ServiceDeps,
    workload: WorkloadType,
    points: Vec<MetricPoint>,
) -> Result<(), ServiceError> {
    if points.is_empty() {
        return Ok(());
    }
    deps.timeseries.write_points(workload, points).await.map_err(ServiceError::TimeSeries)
}

#[cfg(test)]
#[path = "ship_tests.rs"]
mod tests;
