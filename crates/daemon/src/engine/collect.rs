// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Query execution and row-to-metric transformation.
//!
//! The engine holds no workload knowledge: which statements run, how cells
//! bind, and which unit conversions apply are all declared in the query
//! table. Failures are isolated per query and per row.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, warn};
use wa_adapters::{CellValue, DatabaseConnection, UsageEvent, UsageSink};
use wa_core::{
    parse_memory_bytes, ColumnSpec, DatabaseRole, ErrorCode, MetricPoint, MetricType,
    MetricValue, Normalize, Query, ValueType, WorkloadMetrics, WorkloadType,
};

/// Everything one tick produced before shipping.
pub(crate) struct CollectOutcome {
    pub batch: WorkloadMetrics,
    pub points: Vec<MetricPoint>,
}

/// Run every role-matching query and aggregate all emitted metrics into a
/// single batch. A failed query is skipped and recorded; the rest proceed.
pub(crate) async fn run_queries(
    conn: &dyn DatabaseConnection,
    queries: &[Query],
    role: DatabaseRole,
    timeout: Duration,
    workload: WorkloadType,
    usage: &dyn UsageSink,
) -> CollectOutcome {
    let mut batch = WorkloadMetrics::new(workload);
    let mut points = Vec::new();

    for query in queries {
        if !query.matches_role(role) {
            debug!(query = %query.name, ?role, "query gated off by database role");
            continue;
        }

        let rows = match conn.query(&query.sql, timeout).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(%workload, query = %query.name, error = %e, "query failed, skipping");
                usage.record(UsageEvent::Error(ErrorCode::QueryExecution));
                continue;
            }
        };

        let bindings: Vec<(usize, &ColumnSpec)> = query
            .columns
            .iter()
            .filter_map(|spec| {
                let idx = rows.column_index(&spec.source_name);
                if idx.is_none() {
                    warn!(
                        query = %query.name,
                        column = %spec.source_name,
                        "declared column missing from result set"
                    );
                }
                idx.map(|i| (i, spec))
            })
            .collect();

        'rows: for row in &rows.rows {
            let mut labels = BTreeMap::new();
            let mut emitted = Vec::new();

            for (idx, spec) in &bindings {
                let Some(cell) = row.get(*idx) else {
                    warn!(query = %query.name, "short row dropped");
                    continue 'rows;
                };
                let value = match bind_cell(cell, spec.value_type, spec.normalize) {
                    Ok(value) => value,
                    Err(reason) => {
                        warn!(
                            query = %query.name,
                            column = %spec.source_name,
                            %reason,
                            "row dropped on bind failure"
                        );
                        continue 'rows;
                    }
                };

                match spec.metric_type {
                    MetricType::Label => {
                        labels.insert(spec.output_key().to_string(), value.to_string());
                    }
                    MetricType::Gauge | MetricType::Cumulative => {
                        emitted.push((*spec, value));
                    }
                }
            }

            for (spec, value) in emitted {
                batch.insert(spec.output_key(), &value);
                points.push(MetricPoint {
                    key: spec.output_key().to_string(),
                    kind: spec.metric_type,
                    value,
                    labels: labels.clone(),
                });
            }
        }
    }

    CollectOutcome { batch, points }
}

/// Bind one cell under its declared type, then apply the declared unit
/// conversion.
fn bind_cell(
    cell: &CellValue,
    value_type: ValueType,
    normalize: Normalize,
) -> Result<MetricValue, String> {
    let value = match (value_type, cell) {
        (_, CellValue::Null) => return Err("null cell".to_string()),

        (ValueType::String, CellValue::Text(s)) => MetricValue::Text(s.clone()),
        (ValueType::String, CellValue::Int(i)) => MetricValue::Text(i.to_string()),
        (ValueType::String, CellValue::Float(f)) => MetricValue::Text(f.to_string()),
        (ValueType::String, CellValue::Bool(b)) => MetricValue::Text(b.to_string()),

        (ValueType::Int64, CellValue::Int(i)) => MetricValue::Int(*i),
        (ValueType::Int64, CellValue::Text(s)) => MetricValue::Int(
            s.trim().parse().map_err(|_| format!("not an integer: {s:?}"))?,
        ),
        (ValueType::Int64, CellValue::Bool(b)) => MetricValue::Int(i64::from(*b)),
        (ValueType::Int64, CellValue::Float(_)) => {
            return Err("float cell bound as int64".to_string());
        }

        (ValueType::Double, CellValue::Float(f)) => MetricValue::Double(*f),
        (ValueType::Double, CellValue::Int(i)) => MetricValue::Double(*i as f64),
        (ValueType::Double, CellValue::Text(s)) => MetricValue::Double(
            s.trim().parse().map_err(|_| format!("not a number: {s:?}"))?,
        ),
        (ValueType::Double, CellValue::Bool(_)) => {
            return Err("bool cell bound as double".to_string());
        }

        (ValueType::Bool, CellValue::Bool(b)) => MetricValue::Bool(*b),
        (ValueType::Bool, CellValue::Int(i)) => MetricValue::Bool(*i != 0),
        (ValueType::Bool, CellValue::Text(s)) => {
            match s.trim().to_ascii_lowercase().as_str() {
                "t" | "true" | "on" | "1" | "yes" => MetricValue::Bool(true),
                "f" | "false" | "off" | "0" | "no" => MetricValue::Bool(false),
                other => return Err(format!("not a boolean: {other:?}")),
            }
        }
        (ValueType::Bool, CellValue::Float(_)) => {
            return Err("float cell bound as bool".to_string());
        }
    };

    match normalize {
        Normalize::None => Ok(value),
        Normalize::MemoryBytes => parse_memory_bytes(&value.to_string())
            .map(MetricValue::Int)
            .map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
#[path = "collect_tests.rs"]
mod tests;
