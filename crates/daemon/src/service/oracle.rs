// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Oracle workload. The probed client library is Linux-only, so the
//! service refuses to activate anywhere else.

use std::time::Duration;

use async_trait::async_trait;
use wa_adapters::DatabaseConnection;
use wa_core::{DatabaseIdentity, DatabaseRole, WorkloadType};

use super::{first_text, text_column, Workload};
use crate::error::ServiceError;

pub struct OracleWorkload;

#[async_trait]
impl Workload for OracleWorkload {
    fn workload_type(&self) -> WorkloadType {
        WorkloadType::Oracle
    }

    fn process_prefixes(&self) -> &'static [&'static str] {
        &["ora_pmon_", "tnslsnr"]
    }

    fn platform_supported(&self) -> bool {
        cfg!(target_os = "linux")
    }

    async fn detect_role(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseRole, ServiceError> {
        let rows = conn
            .query("SELECT database_role FROM v$database", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "database_role".to_string(), source })?;
        Ok(match first_text(&rows).as_deref() {
            Some(role) if role.contains("STANDBY") => DatabaseRole::Standby,
            _ => DatabaseRole::Primary,
        })
    }

    async fn discover_identity(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseIdentity, ServiceError> {
        let version = conn
            .query("SELECT version FROM v$instance", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "version".to_string(), source })
            .map(|rows| first_text(&rows).unwrap_or_default())?;

        let databases = conn
            .query("SELECT name FROM v$database", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "database_name".to_string(), source })
            .map(|rows| text_column(&rows, "name"))?;

        Ok(DatabaseIdentity { instance_name: String::new(), version, databases })
    }
}

#[cfg(test)]
#[path = "oracle_tests.rs"]
mod tests;
