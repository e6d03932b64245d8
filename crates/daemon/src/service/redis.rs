// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis workload. `INFO` output arrives as one text blob; the probes
//! scan it line-wise.

use std::time::Duration;

use async_trait::async_trait;
use wa_adapters::DatabaseConnection;
use wa_core::{DatabaseIdentity, DatabaseRole, WorkloadType};

use super::{first_text, Workload};
use crate::error::ServiceError;

pub struct RedisWorkload;

fn info_field(blob: &str, field: &str) -> Option<String> {
    blob.lines().find_map(|line| {
        line.trim()
            .strip_prefix(field)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|value| value.trim().to_string())
    })
}

#[async_trait]
impl Workload for RedisWorkload {
    fn workload_type(&self) -> WorkloadType {
        WorkloadType::Redis
    }

    fn process_prefixes(&self) -> &'static [&'static str] {
        &["redis-server"]
    }

    async fn detect_role(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseRole, ServiceError> {
        let rows = conn
            .query("INFO replication", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "replication_info".to_string(), source })?;
        let blob = first_text(&rows).unwrap_or_default();
        Ok(match info_field(&blob, "role").as_deref() {
            Some("master") | None => DatabaseRole::Primary,
            Some(_) => DatabaseRole::Standby,
        })
    }

    async fn discover_identity(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseIdentity, ServiceError> {
        let rows = conn
            .query("INFO server", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "server_info".to_string(), source })?;
        let blob = first_text(&rows).unwrap_or_default();

        Ok(DatabaseIdentity {
            instance_name: info_field(&blob, "run_id").unwrap_or_default(),
            version: info_field(&blob, "redis_version").unwrap_or_default(),
            databases: Vec::new(),
        })
    }
}

#[cfg(test)]
#[path = "redis_tests.rs"]
mod tests;
