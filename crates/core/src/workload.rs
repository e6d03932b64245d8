// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supported workload kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A database workload the agent knows how to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadType {
    Oracle,
    Mysql,
    Postgres,
    Redis,
    Mongodb,
    Sqlserver,
    Unknown,
}

impl WorkloadType {
    /// All workloads the supervisor launches a service for.
    pub const ALL: [WorkloadType; 6] = [
        WorkloadType::Oracle,
        WorkloadType::Mysql,
        WorkloadType::Postgres,
        WorkloadType::Redis,
        WorkloadType::Mongodb,
        WorkloadType::Sqlserver,
    ];

    /// Enum name used by the data-warehouse insight payload.
    ///
    /// Anything the warehouse does not recognize maps to
    /// `WORKLOAD_TYPE_UNSPECIFIED`.
    pub fn insight_name(&self) -> &'static str {
        match self {
            WorkloadType::Oracle => "WORKLOAD_TYPE_ORACLE",
            WorkloadType::Mysql => "WORKLOAD_TYPE_MYSQL",
            WorkloadType::Postgres => "WORKLOAD_TYPE_POSTGRES",
            WorkloadType::Redis => "WORKLOAD_TYPE_REDIS",
            WorkloadType::Mongodb => "WORKLOAD_TYPE_MONGODB",
            WorkloadType::Sqlserver => "WORKLOAD_TYPE_SQLSERVER",
            WorkloadType::Unknown => "WORKLOAD_TYPE_UNSPECIFIED",
        }
    }

    /// Parse the override-file spelling (`POSTGRES`, `MYSQL`, ...).
    /// Unrecognized names become [`WorkloadType::Unknown`].
    pub fn from_override_name(name: &str) -> WorkloadType {
        match name.trim().to_ascii_uppercase().as_str() {
            "ORACLE" => WorkloadType::Oracle,
            "MYSQL" => WorkloadType::Mysql,
            "POSTGRES" | "POSTGRESQL" => WorkloadType::Postgres,
            "REDIS" => WorkloadType::Redis,
            "MONGODB" | "MONGO" => WorkloadType::Mongodb,
            "SQLSERVER" | "MSSQL" => WorkloadType::Sqlserver,
            _ => WorkloadType::Unknown,
        }
    }
}

impl fmt::Display for WorkloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkloadType::Oracle => "oracle",
            WorkloadType::Mysql => "mysql",
            WorkloadType::Postgres => "postgres",
            WorkloadType::Redis => "redis",
            WorkloadType::Mongodb => "mongodb",
            WorkloadType::Sqlserver => "sqlserver",
            WorkloadType::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
#[path = "workload_tests.rs"]
mod tests;
