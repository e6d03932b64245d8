// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stable numeric error codes for the usage-metric sink.
//!
//! Codes are part of the telemetry contract: never renumber an existing
//! variant, only append.

use crate::workload::WorkloadType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unknown,
    ConfigFileRead,
    ProcessDiscovery,
    OracleService,
    MysqlService,
    PostgresService,
    RedisService,
    MongodbService,
    SqlserverService,
    SecretFetch,
    DatabaseConnection,
    QueryExecution,
    InsightWrite,
    TimeSeriesWrite,
}

impl ErrorCode {
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::Unknown => 0,
            ErrorCode::ConfigFileRead => 1,
            ErrorCode::ProcessDiscovery => 2,
            ErrorCode::OracleService => 3,
            ErrorCode::MysqlService => 4,
            ErrorCode::PostgresService => 5,
            ErrorCode::RedisService => 6,
            ErrorCode::MongodbService => 7,
            ErrorCode::SqlserverService => 8,
            ErrorCode::SecretFetch => 9,
            ErrorCode::DatabaseConnection => 10,
            ErrorCode::QueryExecution => 11,
            ErrorCode::InsightWrite => 12,
            ErrorCode::TimeSeriesWrite => 13,
        }
    }

    /// The service-level code a workload's recoverable routine reports under.
    pub fn for_workload(workload: WorkloadType) -> ErrorCode {
        match workload {
            WorkloadType::Oracle => ErrorCode::OracleService,
            WorkloadType::Mysql => ErrorCode::MysqlService,
            WorkloadType::Postgres => ErrorCode::PostgresService,
            WorkloadType::Redis => ErrorCode::RedisService,
            WorkloadType::Mongodb => ErrorCode::MongodbService,
            WorkloadType::Sqlserver => ErrorCode::SqlserverService,
            WorkloadType::Unknown => ErrorCode::Unknown,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

#[cfg(test)]
#[path = "error_code_tests.rs"]
mod tests;
