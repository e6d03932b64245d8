// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metric batches and time-series points emitted by a collection tick.

use crate::query::MetricType;
use crate::workload::WorkloadType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A typed metric value bound from a result cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Double(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{}", v),
            MetricValue::Double(v) => write!(f, "{}", v),
            MetricValue::Bool(v) => write!(f, "{}", v),
            MetricValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// One point of the time-series stream.
///
/// Cumulative points are forwarded exactly as collected; the shipper never
/// rewrites them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub key: String,
    pub kind: MetricType,
    pub value: MetricValue,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// The per-tick batch shipped to the data warehouse.
///
/// Keys are unique within a batch; iteration order is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadMetrics {
    pub workload_type: WorkloadType,
    pub metrics: BTreeMap<String, String>,
}

impl WorkloadMetrics {
    pub fn new(workload_type: WorkloadType) -> Self {
        Self { workload_type, metrics: BTreeMap::new() }
    }

    /// Insert a stringified metric value. Later writes win on key collision.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.metrics.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.metrics.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
