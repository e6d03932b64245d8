// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The time-series metrics endpoint.

use async_trait::async_trait;
use serde::Serialize;
use wa_core::{MetricPoint, WorkloadType};

use crate::error::AdapterError;

/// Ships gauge and cumulative points collected in one tick.
///
/// Cumulative values arrive exactly as collected and must be forwarded
/// unmodified.
#[async_trait]
pub trait TimeSeriesClient: Send + Sync {
    async fn write_points(
        &self,
        workload: WorkloadType,
        points: Vec<MetricPoint>,
    ) -> Result<(), AdapterError>;
}

#[derive(Serialize)]
struct WritePointsRequest<'a> {
    workload_type: &'a str,
    points: &'a [MetricPoint],
}

/// JSON-over-HTTP client for the time-series endpoint.
pub struct RestTimeSeriesClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RestTimeSeriesClient {
    pub fn new(endpoint: String) -> Self {
        Self { client: reqwest::Client::new(), endpoint }
    }
}

#[async_trait]
impl TimeSeriesClient for RestTimeSeriesClient {
    async fn write_points(
        &self,
        workload: WorkloadType,
        points: Vec<MetricPoint>,
    ) -> Result<(), AdapterError> {
        if points.is_empty() {
            return Ok(());
        }
        let body = WritePointsRequest { workload_type: workload.insight_name(), points: &points };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AdapterError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AdapterError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Records shipped points per workload.
#[cfg(any(test, feature = "test-support"))]
pub struct FakeTimeSeriesClient {
    pub shipped: parking_lot::Mutex<Vec<(WorkloadType, Vec<MetricPoint>)>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeTimeSeriesClient {
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self { shipped: parking_lot::Mutex::new(Vec::new()) })
    }

    pub fn points_for(&self, workload: WorkloadType) -> Vec<MetricPoint> {
        self.shipped
            .lock()
            .iter()
            .filter(|(w, _)| *w == workload)
            .flat_map(|(_, points)| points.clone())
            .collect()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl TimeSeriesClient for FakeTimeSeriesClient {
    async fn write_points(
        &self,
        workload: WorkloadType,
        points: Vec<MetricPoint>,
    ) -> Result<(), AdapterError> {
        self.shipped.lock().push((workload, points));
        Ok(())
    }
}
