// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The declarative query model.
//!
//! Queries and their column specs ship as data in the configuration
//! document; the collection engine is a pure interpreter over this table.

use serde::{Deserialize, Serialize};

/// Which instance role a query may execute against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseRole {
    Primary,
    Standby,
    #[default]
    Both,
}

/// How a result column is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    /// Attached to the row's other metrics as a label.
    Label,
    /// Point-in-time value.
    Gauge,
    /// Monotone non-decreasing counter; never rewritten downstream.
    Cumulative,
}

/// Declared type a result cell is bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    String,
    Int64,
    Double,
    Bool,
}

/// Unit conversion applied to the raw cell before emission.
///
/// The engine holds no physics of its own; every conversion is declared
/// here, next to the query that produces the raw value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalize {
    #[default]
    None,
    /// Parse `kB`/`MB`/`GB` suffixed strings into an integer byte count.
    MemoryBytes,
}

impl Normalize {
    fn is_none(&self) -> bool {
        matches!(self, Normalize::None)
    }
}

/// One result column of a [`Query`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    pub metric_type: MetricType,
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Normalize::is_none")]
    pub normalize: Normalize,
}

impl ColumnSpec {
    /// Metric key this column emits under.
    pub fn output_key(&self) -> &str {
        self.output_name.as_deref().unwrap_or(&self.source_name)
    }
}

/// One entry of a workload's query table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub name: String,
    pub sql: String,
    #[serde(default)]
    pub database_role: DatabaseRole,
    pub columns: Vec<ColumnSpec>,
}

impl Query {
    /// A `primary` query never runs on a standby and vice versa; `both`
    /// is unconditional.
    pub fn matches_role(&self, role: DatabaseRole) -> bool {
        match self.database_role {
            DatabaseRole::Both => true,
            declared => declared == role,
        }
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
