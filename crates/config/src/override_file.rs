// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic metric-override file.
//!
//! A simple `key: value` line format grouped by `workload_type:` headers:
//!
//! ```text
//! workload_type: POSTGRES
//! work_mem: 80MB
//! workload_type: MYSQL
//! innodb_buffer_pool_size: 134217728
//! ```
//!
//! The file is read on every collection tick and shipped as a parallel
//! stream of synthetic batches. It is never written by the agent.

use std::path::Path;

use wa_core::{WorkloadMetrics, WorkloadType};

const WORKLOAD_HEADER: &str = "workload_type";

/// Parse override-file content into synthetic metric batches.
///
/// Lines before the first header and lines without a `:` are skipped, as
/// are blank lines and `#` comments.
pub fn parse_override(content: &str) -> Vec<WorkloadMetrics> {
    let mut batches: Vec<WorkloadMetrics> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        if key == WORKLOAD_HEADER {
            batches.push(WorkloadMetrics::new(WorkloadType::from_override_name(value)));
        } else if let Some(current) = batches.last_mut() {
            current.insert(key, value);
        }
    }

    batches.retain(|b| !b.is_empty());
    batches
}

/// Read the override file if it exists. `Ok(None)` means no file.
pub fn read_override(path: &Path) -> Result<Option<Vec<WorkloadMetrics>>, std::io::Error> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(parse_override(&content))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "override_file_tests.rs"]
mod tests;
