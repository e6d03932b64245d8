// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! MySQL workload: replica-status role probe and replication topology.

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use wa_adapters::{AdapterError, CellValue, DatabaseConnection, NameResolver};
use wa_core::{zone_from_fqdn, DatabaseIdentity, DatabaseRole, WorkloadMetrics, WorkloadType};

use super::{text_column, ServiceDeps, Workload};
use crate::error::ServiceError;

pub struct MysqlWorkload;

#[async_trait]
impl Workload for MysqlWorkload {
    fn workload_type(&self) -> WorkloadType {
        WorkloadType::Mysql
    }

    fn process_prefixes(&self) -> &'static [&'static str] {
        &["mysqld"]
    }

    /// `SHOW REPLICA STATUS` on 8.0.22+, falling back to the old spelling.
    /// Any row means this instance replicates from a source.
    async fn detect_role(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseRole, ServiceError> {
        let rows = match conn.query("SHOW REPLICA STATUS", timeout).await {
            Ok(rows) => rows,
            Err(_) => conn
                .query("SHOW SLAVE STATUS", timeout)
                .await
                .map_err(|source| ServiceError::Query { name: "replica_status".to_string(), source })?,
        };
        Ok(if rows.rows.is_empty() { DatabaseRole::Primary } else { DatabaseRole::Standby })
    }

    async fn discover_identity(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseIdentity, ServiceError> {
        let version = conn
            .query("SELECT VERSION() AS version", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "version".to_string(), source })
            .map(|rows| super::first_text(&rows).unwrap_or_default())?;

        let databases = conn
            .query("SHOW DATABASES", timeout)
            .await
            .map_err(|source| ServiceError::Query { name: "databases".to_string(), source })
            .map(|rows| text_column(&rows, "Database"))?;

        Ok(DatabaseIdentity { instance_name: String::new(), version, databases })
    }

    /// On a source instance, resolve the zone of every connected replica
    /// and emit them as one comma-joined metric. Per-address failures are
    /// logged and skipped.
    async fn augment(
        &self,
        conn: &dyn DatabaseConnection,
        role: DatabaseRole,
        deps: &ServiceDeps,
        timeout: Duration,
        out: &mut WorkloadMetrics,
    ) -> Result<(), ServiceError> {
        if role != DatabaseRole::Primary {
            return Ok(());
        }

        let rows = match conn.query("SHOW REPLICAS", timeout).await {
            Ok(rows) => rows,
            Err(_) => match conn.query("SHOW SLAVE HOSTS", timeout).await {
                Ok(rows) => rows,
                Err(e) => {
                    debug!(error = %e, "replica topology unavailable");
                    return Ok(());
                }
            },
        };

        let Some(host_idx) = rows.column_index("Host") else {
            return Ok(());
        };

        let mut zones = BTreeSet::new();
        for row in &rows.rows {
            let Some(CellValue::Text(address)) = row.get(host_idx) else {
                continue;
            };
            match resolve_zone(deps.resolver.as_ref(), address).await {
                Ok(Some(zone)) => {
                    zones.insert(zone);
                }
                Ok(None) => {}
                Err(e) => debug!(address = %address, error = %e, "replica address did not resolve"),
            }
        }

        if !zones.is_empty() {
            out.insert("replication_zones", zones.into_iter().collect::<Vec<_>>().join(","));
        }
        Ok(())
    }
}

/// Resolve one replica address to its zone tag: an IP goes straight to
/// reverse DNS; a hostname resolves forward first. The zone is the second
/// dotted component of the resulting FQDN.
async fn resolve_zone(
    resolver: &dyn NameResolver,
    address: &str,
) -> Result<Option<String>, AdapterError> {
    let fqdn = match address.parse::<IpAddr>() {
        Ok(ip) => resolver.reverse(ip).await?,
        Err(_) => {
            let addrs = resolver.forward(address).await?;
            let ip = addrs.into_iter().next().ok_or_else(|| {
                AdapterError::Resolve(address.to_string(), "no addresses".to_string())
            })?;
            resolver.reverse(ip).await?
        }
    };
    Ok(zone_from_fqdn(&fqdn))
}

#[cfg(test)]
#[path = "mysql_tests.rs"]
mod tests;
