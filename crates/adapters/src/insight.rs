// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The data-warehouse insight endpoint.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use wa_core::{CloudProperties, WorkloadMetrics};

use crate::error::AdapterError;

/// Validation block carried inside a write-insight request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadValidation {
    pub workload_type: String,
    pub validation_details: BTreeMap<String, String>,
    pub project_id: String,
    pub instance_name: String,
    pub agent_version: String,
}

/// One insight shipped to the warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteInsightRequest {
    pub instance_id: String,
    pub validation: WorkloadValidation,
}

impl WriteInsightRequest {
    /// Translate a metric batch plus host identity into the wire shape.
    ///
    /// Workload kinds the warehouse does not know become
    /// `WORKLOAD_TYPE_UNSPECIFIED` via the fixed enum mapping.
    pub fn from_batch(cloud: &CloudProperties, batch: &WorkloadMetrics) -> Self {
        Self {
            instance_id: cloud.instance_id.clone(),
            validation: WorkloadValidation {
                workload_type: batch.workload_type.insight_name().to_string(),
                validation_details: batch.metrics.clone(),
                project_id: cloud.project_id.clone(),
                instance_name: cloud.instance_name.clone(),
                agent_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

/// Delivers insights to the warehouse.
#[async_trait]
pub trait InsightClient: Send + Sync {
    async fn write_insight(&self, request: WriteInsightRequest) -> Result<(), AdapterError>;
}

/// JSON-over-HTTP client for the warehouse endpoint.
pub struct RestInsightClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RestInsightClient {
    pub fn new(endpoint: String) -> Self {
        Self { client: reqwest::Client::new(), endpoint }
    }
}

#[async_trait]
impl InsightClient for RestInsightClient {
    async fn write_insight(&self, request: WriteInsightRequest) -> Result<(), AdapterError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| AdapterError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AdapterError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Records every request; can be scripted to fail the first N writes.
#[cfg(any(test, feature = "test-support"))]
pub struct FakeInsightClient {
    pub requests: parking_lot::Mutex<Vec<WriteInsightRequest>>,
    failures_remaining: parking_lot::Mutex<u32>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeInsightClient {
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self {
            requests: parking_lot::Mutex::new(Vec::new()),
            failures_remaining: parking_lot::Mutex::new(0),
        })
    }

    pub fn fail_next(&self, count: u32) {
        *self.failures_remaining.lock() = count;
    }

    pub fn recorded(&self) -> Vec<WriteInsightRequest> {
        self.requests.lock().clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl InsightClient for FakeInsightClient {
    async fn write_insight(&self, request: WriteInsightRequest) -> Result<(), AdapterError> {
        let mut failures = self.failures_remaining.lock();
        if *failures > 0 {
            *failures -= 1;
            return Err(AdapterError::Status(503));
        }
        drop(failures);
        self.requests.lock().push(request);
        Ok(())
    }
}

#[cfg(test)]
#[path = "insight_tests.rs"]
mod tests;
