// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SQL Server workload.

use std::time::Duration;

use async_trait::async_trait;
use wa_adapters::DatabaseConnection;
use wa_core::{DatabaseIdentity, DatabaseRole, WorkloadType};

use super::{first_text, text_column, Workload};
use crate::error::ServiceError;

pub struct SqlserverWorkload;

#[async_trait]
impl Workload for SqlserverWorkload {
    fn workload_type(&self) -> WorkloadType {
        WorkloadType::Sqlserver
    }

    fn process_prefixes(&self) -> &'static [&'static str] {
        &["sqlservr"]
    }

    /// An instance outside any availability group has no local replica
    /// state row and acts as a primary.
    async fn detect_role(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseRole, ServiceError> {
        let rows = conn
            .query(
                "SELECT role_desc FROM sys.dm_hadr_availability_replica_states WHERE is_local = 1",
                timeout,
            )
            .await
            .map_err(|source| ServiceError::Query { name: "replica_role".to_string(), source })?;
        Ok(match first_text(&rows).as_deref() {
            Some("SECONDARY") => DatabaseRole::Standby,
            _ => DatabaseRole::Primary,
        })
    }

    async fn discover_identity(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseIdentity, ServiceError> {
        let version = conn
            .query("SELECT @@VERSION AS version", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "version".to_string(), source })
            .map(|rows| first_text(&rows).unwrap_or_default())?;

        let databases = conn
            .query("SELECT name FROM sys.databases", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "databases".to_string(), source })
            .map(|rows| text_column(&rows, "name"))?;

        Ok(DatabaseIdentity { instance_name: String::new(), version, databases })
    }
}

#[cfg(test)]
#[path = "sqlserver_tests.rs"]
mod tests;
