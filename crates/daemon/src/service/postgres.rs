// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PostgreSQL workload.

use std::time::Duration;

use async_trait::async_trait;
use wa_adapters::DatabaseConnection;
use wa_core::{DatabaseIdentity, DatabaseRole, WorkloadType};

use super::{first_bool, first_text, text_column, Workload};
use crate::error::ServiceError;

pub struct PostgresWorkload;

#[async_trait]
impl Workload for PostgresWorkload {
    fn workload_type(&self) -> WorkloadType {
        WorkloadType::Postgres
    }

    fn process_prefixes(&self) -> &'static [&'static str] {
        &["postgres"]
    }

    /// An instance in recovery is a streaming standby.
    async fn detect_role(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseRole, ServiceError> {
        let rows = conn
            .query("SELECT pg_is_in_recovery() AS in_recovery", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "in_recovery".to_string(), source })?;
        Ok(match first_bool(&rows, "in_recovery") {
            Some(true) => DatabaseRole::Standby,
            _ => DatabaseRole::Primary,
        })
    }

    async fn discover_identity(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseIdentity, ServiceError> {
        let version = conn
            .query("SHOW server_version", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "server_version".to_string(), source })
            .map(|rows| first_text(&rows).unwrap_or_default())?;

        let databases = conn
            .query(
                "SELECT datname FROM pg_database WHERE datistemplate = false",
                timeout,
            )
            .await
            .map_err(|source| ServiceError::Query { name: "databases".to_string(), source })
            .map(|rows| text_column(&rows, "datname"))?;

        Ok(DatabaseIdentity { instance_name: String::new(), version, databases })
    }
}

#[cfg(test)]
#[path = "postgres_tests.rs"]
mod tests;
