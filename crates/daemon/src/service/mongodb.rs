// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! MongoDB workload.

use std::time::Duration;

use async_trait::async_trait;
use wa_adapters::DatabaseConnection;
use wa_core::{DatabaseIdentity, DatabaseRole, WorkloadType};

use super::{first_bool, first_text, text_column, Workload};
use crate::error::ServiceError;

pub struct MongodbWorkload;

#[async_trait]
impl Workload for MongodbWorkload {
    fn workload_type(&self) -> WorkloadType {
        WorkloadType::Mongodb
    }

    fn process_prefixes(&self) -> &'static [&'static str] {
        &["mongod"]
    }

    /// `hello` reports writable-primary; older servers answer `ismaster`.
    /// A standalone instance with neither field acts as a primary.
    async fn detect_role(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseRole, ServiceError> {
        let rows = conn
            .query("hello", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "hello".to_string(), source })?;
        let writable =
            first_bool(&rows, "isWritablePrimary").or_else(|| first_bool(&rows, "ismaster"));
        Ok(match writable {
            Some(false) => DatabaseRole::Standby,
            _ => DatabaseRole::Primary,
        })
    }

    async fn discover_identity(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseIdentity, ServiceError> {
        let version = conn
            .query("buildInfo", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "buildInfo".to_string(), source })
            .map(|rows| first_text(&rows).unwrap_or_default())?;

        let databases = conn
            .query("listDatabases", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "listDatabases".to_string(), source })
            .map(|rows| text_column(&rows, "name"))?;

        Ok(DatabaseIdentity { instance_name: String::new(), version, databases })
    }
}

#[cfg(test)]
#[path = "mongodb_tests.rs"]
mod tests;
