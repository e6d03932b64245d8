// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn every_workload_ships_a_query_table() {
    for workload in WorkloadType::ALL {
        assert!(
            !default_queries(workload).is_empty(),
            "no default queries for {workload}"
        );
    }
}

#[test]
fn output_keys_are_unique_per_table() {
    for workload in WorkloadType::ALL {
        let mut keys: Vec<String> = default_queries(workload)
            .iter()
            .flat_map(|q| q.columns.iter())
            .filter(|c| c.metric_type != MetricType::Label)
            .map(|c| c.output_key().to_string())
            .collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total, "duplicate metric key in {workload} table");
    }
}

#[test]
fn postgres_memory_readings_declare_normalization() {
    let queries = default_queries(WorkloadType::Postgres);
    let work_mem = queries.iter().find(|q| q.name == "work_mem").unwrap();
    assert_eq!(work_mem.columns[0].normalize, Normalize::MemoryBytes);
}

#[test]
fn mysql_counter_is_cumulative_and_primary_only() {
    let queries = default_queries(WorkloadType::Mysql);
    let questions = queries.iter().find(|q| q.name == "questions").unwrap();
    assert_eq!(questions.database_role, DatabaseRole::Primary);
    let value_col = questions.columns.iter().find(|c| c.output_key() == "questions").unwrap();
    assert_eq!(value_col.metric_type, MetricType::Cumulative);
}
