// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Database access behind a driver-agnostic interface.
//!
//! The collection engine interprets its query table against
//! [`DatabaseConnection`]; the wire protocol underneath is a deployment
//! concern. MySQL and PostgreSQL ship with an embedded sqlx-backed
//! connector; the remaining workloads need an external implementation.

use std::time::Duration;

use async_trait::async_trait;
use wa_core::WorkloadType;

use crate::error::AdapterError;

/// A data-source description assembled from connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    pub workload: WorkloadType,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: Option<String>,
    pub max_connections: u32,
}

impl Dsn {
    pub fn default_port(workload: WorkloadType) -> u16 {
        match workload {
            WorkloadType::Oracle => 1521,
            WorkloadType::Mysql => 3306,
            WorkloadType::Postgres => 5432,
            WorkloadType::Redis => 6379,
            WorkloadType::Mongodb => 27017,
            WorkloadType::Sqlserver => 1433,
            WorkloadType::Unknown => 0,
        }
    }

    /// Connection URL for the embedded sqlx connector.
    fn url(&self) -> Result<String, AdapterError> {
        let scheme = match self.workload {
            WorkloadType::Mysql => "mysql",
            WorkloadType::Postgres => "postgres",
            other => return Err(AdapterError::NoDriver(other)),
        };
        let database = match (&self.database, self.workload) {
            (Some(db), _) => db.clone(),
            (None, WorkloadType::Postgres) => "postgres".to_string(),
            (None, _) => String::new(),
        };
        Ok(format!(
            "{scheme}://{}:{}@{}:{}/{database}",
            self.username, self.password, self.host, self.port
        ))
    }
}

/// One result cell, untyped until the query table binds it.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// A fully materialized result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryRows {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Opens connections for one workload's data source.
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    async fn connect(&self, dsn: &Dsn) -> Result<Box<dyn DatabaseConnection>, AdapterError>;
}

/// A live connection the metric loop owns for the life of its loop.
#[async_trait]
pub trait DatabaseConnection: Send + Sync {
    /// Liveness probe issued once right after connect.
    async fn ping(&self) -> Result<(), AdapterError>;

    /// Execute one statement under a deadline and materialize the rows.
    async fn query(&self, sql: &str, timeout: Duration) -> Result<QueryRows, AdapterError>;

    async fn close(&self);
}

/// Embedded connector for MySQL and PostgreSQL over `sqlx::Any`.
#[derive(Default)]
pub struct SqlxConnector;

#[async_trait]
impl DatabaseConnector for SqlxConnector {
    async fn connect(&self, dsn: &Dsn) -> Result<Box<dyn DatabaseConnection>, AdapterError> {
        let url = dsn.url()?;
        sqlx::any::install_default_drivers();
        let pool = sqlx::any::AnyPoolOptions::new()
            .max_connections(dsn.max_connections.max(1))
            .connect(&url)
            .await
            .map_err(|e| AdapterError::Database(e.to_string()))?;
        Ok(Box::new(SqlxConnection { pool }))
    }
}

struct SqlxConnection {
    pool: sqlx::AnyPool,
}

#[async_trait]
impl DatabaseConnection for SqlxConnection {
    async fn ping(&self) -> Result<(), AdapterError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AdapterError::Database(e.to_string()))
    }

    async fn query(&self, sql: &str, timeout: Duration) -> Result<QueryRows, AdapterError> {
        use sqlx::{Column, Row};

        let rows = tokio::time::timeout(timeout, sqlx::query(sql).fetch_all(&self.pool))
            .await
            .map_err(|_| AdapterError::QueryTimeout(timeout))?
            .map_err(|e| AdapterError::Database(e.to_string()))?;

        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let rows = rows
            .iter()
            .map(|row| (0..row.columns().len()).map(|i| decode_cell(row, i)).collect())
            .collect();

        Ok(QueryRows { columns, rows })
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// `Any` rows carry no declared types; probe the narrow decodings first
/// so numeric cells stay numeric.
fn decode_cell(row: &sqlx::any::AnyRow, idx: usize) -> CellValue {
    use sqlx::Row;

    if let Ok(v) = row.try_get::<i64, _>(idx) {
        return CellValue::Int(v);
    }
    if let Ok(v) = row.try_get::<f64, _>(idx) {
        return CellValue::Float(v);
    }
    if let Ok(v) = row.try_get::<bool, _>(idx) {
        return CellValue::Bool(v);
    }
    if let Ok(v) = row.try_get::<String, _>(idx) {
        return CellValue::Text(v);
    }
    CellValue::Null
}

/// In-memory database keyed by statement text.
#[cfg(any(test, feature = "test-support"))]
pub struct FakeDatabase {
    responses: parking_lot::Mutex<std::collections::HashMap<String, Result<QueryRows, String>>>,
    ping_failures: parking_lot::Mutex<u32>,
    pub executed: parking_lot::Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeDatabase {
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self {
            responses: parking_lot::Mutex::new(std::collections::HashMap::new()),
            ping_failures: parking_lot::Mutex::new(0),
            executed: parking_lot::Mutex::new(Vec::new()),
        })
    }

    /// Respond to `sql` with a single-column, single-row text result.
    pub fn on_scalar(&self, sql: &str, column: &str, value: CellValue) {
        self.on_rows(sql, vec![column.to_string()], vec![vec![value]]);
    }

    pub fn on_rows(
        &self,
        sql: &str,
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) {
        self.responses
            .lock()
            .insert(sql.to_string(), Ok(QueryRows { columns, rows }));
    }

    pub fn on_empty(&self, sql: &str) {
        self.on_rows(sql, Vec::new(), Vec::new());
    }

    pub fn on_error(&self, sql: &str, reason: &str) {
        self.responses.lock().insert(sql.to_string(), Err(reason.to_string()));
    }

    pub fn fail_pings(&self, count: u32) {
        *self.ping_failures.lock() = count;
    }

    pub fn executed_statements(&self) -> Vec<String> {
        self.executed.lock().clone()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl DatabaseConnection for std::sync::Arc<FakeDatabase> {
    async fn ping(&self) -> Result<(), AdapterError> {
        let mut failures = self.ping_failures.lock();
        if *failures > 0 {
            *failures -= 1;
            return Err(AdapterError::Database("ping refused".to_string()));
        }
        Ok(())
    }

    async fn query(&self, sql: &str, _timeout: Duration) -> Result<QueryRows, AdapterError> {
        self.executed.lock().push(sql.to_string());
        match self.responses.lock().get(sql) {
            Some(Ok(rows)) => Ok(rows.clone()),
            Some(Err(reason)) => Err(AdapterError::Database(reason.clone())),
            None => Err(AdapterError::Database(format!("no canned response for: {sql}"))),
        }
    }

    async fn close(&self) {}
}

/// Connector handing out the same fake database to every caller.
#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl DatabaseConnector for std::sync::Arc<FakeDatabase> {
    async fn connect(&self, _dsn: &Dsn) -> Result<Box<dyn DatabaseConnection>, AdapterError> {
        Ok(Box::new(std::sync::Arc::clone(self)))
    }
}

#[cfg(test)]
#[path = "database_tests.rs"]
mod tests;
