// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in defaults: frequencies and the per-workload query tables.

use std::time::Duration;

use wa_core::{ColumnSpec, DatabaseRole, MetricType, Normalize, Query, ValueType, WorkloadType};

pub fn enabled() -> bool {
    true
}

/// Host process scans are slow by design; presence only needs to latch once.
pub fn process_discovery_frequency() -> Duration {
    Duration::from_secs(3 * 3600)
}

pub fn discovery_update_frequency() -> Duration {
    Duration::from_secs(600)
}

pub fn collection_frequency() -> Duration {
    Duration::from_secs(300)
}

pub fn query_timeout() -> Duration {
    Duration::from_secs(10)
}

pub fn max_execution_threads() -> u32 {
    4
}

fn gauge(source: &str, value_type: ValueType) -> ColumnSpec {
    ColumnSpec {
        source_name: source.to_string(),
        output_name: None,
        metric_type: MetricType::Gauge,
        value_type,
        normalize: Normalize::None,
    }
}

fn query(name: &str, sql: &str, role: DatabaseRole, columns: Vec<ColumnSpec>) -> Query {
    Query { name: name.to_string(), sql: sql.to_string(), database_role: role, columns }
}

/// The query table used when a workload's config declares none.
pub fn default_queries(workload: WorkloadType) -> Vec<Query> {
    match workload {
        WorkloadType::Postgres => vec![
            query(
                "work_mem",
                "SHOW work_mem",
                DatabaseRole::Both,
                vec![ColumnSpec {
                    source_name: "work_mem".to_string(),
                    output_name: None,
                    metric_type: MetricType::Gauge,
                    value_type: ValueType::String,
                    normalize: Normalize::MemoryBytes,
                }],
            ),
            query(
                "shared_buffers",
                "SHOW shared_buffers",
                DatabaseRole::Both,
                vec![ColumnSpec {
                    source_name: "shared_buffers".to_string(),
                    output_name: None,
                    metric_type: MetricType::Gauge,
                    value_type: ValueType::String,
                    normalize: Normalize::MemoryBytes,
                }],
            ),
            query(
                "max_connections",
                "SHOW max_connections",
                DatabaseRole::Both,
                vec![gauge("max_connections", ValueType::Int64)],
            ),
        ],
        WorkloadType::Mysql => vec![
            query(
                "innodb_buffer_pool_size",
                "SELECT @@innodb_buffer_pool_size AS innodb_buffer_pool_size",
                DatabaseRole::Both,
                vec![gauge("innodb_buffer_pool_size", ValueType::Int64)],
            ),
            query(
                "max_connections",
                "SELECT @@max_connections AS max_connections",
                DatabaseRole::Both,
                vec![gauge("max_connections", ValueType::Int64)],
            ),
            query(
                "questions",
                "SHOW GLOBAL STATUS LIKE 'Questions'",
                DatabaseRole::Primary,
                vec![
                    ColumnSpec {
                        source_name: "Variable_name".to_string(),
                        output_name: None,
                        metric_type: MetricType::Label,
                        value_type: ValueType::String,
                        normalize: Normalize::None,
                    },
                    ColumnSpec {
                        source_name: "Value".to_string(),
                        output_name: Some("questions".to_string()),
                        metric_type: MetricType::Cumulative,
                        value_type: ValueType::Int64,
                        normalize: Normalize::None,
                    },
                ],
            ),
        ],
        WorkloadType::Redis => vec![query(
            "maxmemory",
            "CONFIG GET maxmemory",
            DatabaseRole::Both,
            vec![gauge("maxmemory", ValueType::Int64)],
        )],
        WorkloadType::Mongodb => vec![query(
            "connections",
            "serverStatus",
            DatabaseRole::Primary,
            vec![ColumnSpec {
                source_name: "current".to_string(),
                output_name: Some("connections_current".to_string()),
                metric_type: MetricType::Gauge,
                value_type: ValueType::Int64,
                normalize: Normalize::None,
            }],
        )],
        WorkloadType::Sqlserver => vec![query(
            "max_server_memory",
            "SELECT value_in_use AS max_server_memory_mb FROM sys.configurations WHERE name = 'max server memory (MB)'",
            DatabaseRole::Both,
            vec![gauge("max_server_memory_mb", ValueType::Int64)],
        )],
        WorkloadType::Oracle => vec![query(
            "open_cursors",
            "SELECT value AS open_cursors FROM v$parameter WHERE name = 'open_cursors'",
            DatabaseRole::Primary,
            vec![gauge("open_cursors", ValueType::Int64)],
        )],
        WorkloadType::Unknown => Vec::new(),
    }
}

#[cfg(test)]
#[path = "defaults_tests.rs"]
mod tests;
