// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy of the supervisor and collection pipeline.
//!
//! Errors never bubble past the enclosing loop: each one maps to a stable
//! [`ErrorCode`] for the usage sink, and to a skip of the affected unit of
//! work. Persistent failure looks like stale metrics, not a dead process.

use thiserror::Error;
use wa_adapters::AdapterError;
use wa_core::{ErrorCode, WorkloadType};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("process table is empty")]
    EmptyProcessTable,

    #[error("process listing failed: {0}")]
    ProcessList(#[source] AdapterError),

    #[error("secret reference could not be resolved: {0}")]
    Secret(#[source] AdapterError),

    #[error("database connection failed: {0}")]
    Connection(#[source] AdapterError),

    #[error("liveness probe failed: {0}")]
    Ping(#[source] AdapterError),

    #[error("query {name} failed: {source}")]
    Query { name: String, source: AdapterError },

    #[error("identity discovery failed: {0}")]
    Discovery(String),

    #[error("{failed} insight batch(es) failed to ship")]
    Insight { failed: usize },

    #[error("time-series write failed: {0}")]
    TimeSeries(#[source] AdapterError),
}

impl ServiceError {
    /// The usage-metric code this failure is reported under. Faults that
    /// are not specific to one failure class fall back to the owning
    /// workload's service code.
    pub fn error_code(&self, workload: WorkloadType) -> ErrorCode {
        match self {
            ServiceError::EmptyProcessTable | ServiceError::ProcessList(_) => {
                ErrorCode::ProcessDiscovery
            }
            ServiceError::Secret(_) => ErrorCode::SecretFetch,
            ServiceError::Connection(_) | ServiceError::Ping(_) => ErrorCode::DatabaseConnection,
            ServiceError::Query { .. } => ErrorCode::QueryExecution,
            ServiceError::Insight { .. } => ErrorCode::InsightWrite,
            ServiceError::TimeSeries(_) => ErrorCode::TimeSeriesWrite,
            ServiceError::Discovery(_) => ErrorCode::for_workload(workload),
        }
    }

    /// Connection-class faults are retried on the next tick instead of
    /// surfacing through the recoverable wrapper.
    pub fn is_connection_fault(&self) -> bool {
        matches!(
            self,
            ServiceError::Secret(_) | ServiceError::Connection(_) | ServiceError::Ping(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),
}
