// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workload services.
//!
//! All six services are the same state machine over one [`Workload`]
//! implementation each: decide whether to run (configured, or latched from
//! process presence), then drive an inbound-message loop, an optional
//! database-identity discovery loop and an optional metric loop until the
//! root token cancels.

mod mongodb;
mod mysql;
mod oracle;
mod postgres;
mod redis;
mod sqlserver;

pub use mongodb::MongodbWorkload;
pub use mysql::MysqlWorkload;
pub use oracle::OracleWorkload;
pub use postgres::PostgresWorkload;
pub use redis::RedisWorkload;
pub use sqlserver::SqlserverWorkload;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use wa_adapters::{
    CellValue, DatabaseConnection, DatabaseConnector, Dsn, InsightClient, NameResolver,
    QueryRows, SecretResolver, TimeSeriesClient, UsageEvent, UsageSink,
};
use wa_config::{ConnectionParameters, WorkloadConfig};
use wa_core::{
    CloudProperties, DatabaseIdentity, DatabaseRole, DiscoveryMessage, Enablement, ErrorCode,
    ProcessHandle, Query, WorkloadMetrics, WorkloadType,
};

use crate::engine::{collect, ship};
use crate::error::ServiceError;

/// Adapters and host identity shared by every service.
pub struct ServiceDeps {
    pub connector: Arc<dyn DatabaseConnector>,
    pub secrets: Arc<dyn SecretResolver>,
    pub insights: Arc<dyn InsightClient>,
    pub timeseries: Arc<dyn TimeSeriesClient>,
    pub resolver: Arc<dyn NameResolver>,
    pub usage: Arc<dyn UsageSink>,
    pub cloud: CloudProperties,
    pub override_path: PathBuf,
}

/// What makes one workload different from the other five.
#[async_trait]
pub trait Workload: Send + Sync + 'static {
    fn workload_type(&self) -> WorkloadType;

    /// Process-name prefixes that latch `workload_present`.
    fn process_prefixes(&self) -> &'static [&'static str];

    /// Whether the probed client library exists on this host's platform.
    fn platform_supported(&self) -> bool {
        true
    }

    /// Determine the instance role, refreshed at the top of every metric
    /// tick.
    async fn detect_role(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseRole, ServiceError>;

    /// Enumerate the database identity behind the running workload.
    async fn discover_identity(
        &self,
        conn: &dyn DatabaseConnection,
        timeout: Duration,
    ) -> Result<DatabaseIdentity, ServiceError>;

    /// Workload-specific additions to the tick's batch (e.g. replication
    /// topology). Failures inside are logged and skipped, never fatal.
    async fn augment(
        &self,
        _conn: &dyn DatabaseConnection,
        _role: DatabaseRole,
        _deps: &ServiceDeps,
        _timeout: Duration,
        _out: &mut WorkloadMetrics,
    ) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Snapshot state shared between the inbound loop and the activation wait.
#[derive(Default)]
struct ProcessState {
    processes: Option<Vec<Arc<dyn ProcessHandle>>>,
    /// Latches true once and is never cleared, even if the workload later
    /// disappears from the host.
    workload_present: bool,
}

/// The shared service state machine.
pub struct WorkloadService<W: Workload> {
    workload: Arc<W>,
    config: Arc<WorkloadConfig>,
    deps: Arc<ServiceDeps>,
    inbox: Arc<tokio::sync::Mutex<mpsc::Receiver<DiscoveryMessage>>>,
    state: Arc<Mutex<ProcessState>>,
    /// Discovery loop writes, metric loop reads.
    identity: Arc<Mutex<Option<DatabaseIdentity>>>,
}

impl<W: Workload> Clone for WorkloadService<W> {
    fn clone(&self) -> Self {
        Self {
            workload: Arc::clone(&self.workload),
            config: Arc::clone(&self.config),
            deps: Arc::clone(&self.deps),
            inbox: Arc::clone(&self.inbox),
            state: Arc::clone(&self.state),
            identity: Arc::clone(&self.identity),
        }
    }
}

impl<W: Workload> WorkloadService<W> {
    pub fn new(
        workload: W,
        config: WorkloadConfig,
        deps: Arc<ServiceDeps>,
        inbox: mpsc::Receiver<DiscoveryMessage>,
    ) -> Self {
        Self {
            workload: Arc::new(workload),
            config: Arc::new(config),
            deps,
            inbox: Arc::new(tokio::sync::Mutex::new(inbox)),
            state: Arc::new(Mutex::new(ProcessState::default())),
            identity: Arc::new(Mutex::new(None)),
        }
    }

    fn kind(&self) -> WorkloadType {
        self.workload.workload_type()
    }

    /// Drive the service to termination. The enabled-decision is made once
    /// here and never re-evaluated.
    pub async fn start(&self, ctx: CancellationToken) -> Result<(), ServiceError> {
        let workload = self.kind();
        match self.config.enabled {
            Enablement::Disabled => {
                info!(%workload, "service disabled by configuration");
                return Ok(());
            }
            Enablement::Enabled => {
                info!(%workload, "service enabled by configuration");
            }
            Enablement::Auto => {
                info!(%workload, "waiting for workload process");
                if !self.wait_for_workload(&ctx).await {
                    return Ok(());
                }
                info!(%workload, "workload process observed, activating");
            }
        }

        if !self.workload.platform_supported() {
            error!(%workload, "workload is not supported on this platform, refusing to start");
            self.deps.usage.record(UsageEvent::Error(ErrorCode::for_workload(workload)));
            return Ok(());
        }

        self.run_active(ctx).await
    }

    /// Consume discovery messages until the presence latch sets, the
    /// channel closes, or the token cancels.
    async fn wait_for_workload(&self, ctx: &CancellationToken) -> bool {
        loop {
            if self.state.lock().workload_present {
                return true;
            }
            let mut inbox = self.inbox.lock().await;
            tokio::select! {
                _ = ctx.cancelled() => return false,
                message = inbox.recv() => {
                    drop(inbox);
                    match message {
                        Some(message) => self.apply_message(message),
                        None => return false,
                    }
                }
            }
        }
    }

    fn apply_message(&self, message: DiscoveryMessage) {
        let matched = message.processes.iter().any(|p| {
            p.name().map(|name| self.matches_prefix(&name)).unwrap_or(false)
        });

        let mut state = self.state.lock();
        state.processes = Some(message.processes);
        if matched && !state.workload_present {
            state.workload_present = true;
            info!(workload = %self.kind(), origin = ?message.origin, "workload process present on host");
        }
    }

    fn matches_prefix(&self, name: &str) -> bool {
        self.workload.process_prefixes().iter().any(|prefix| name.starts_with(prefix))
    }

    /// Active state: inbound and metric loops as child tasks, discovery
    /// loop inline so its errors surface through the recoverable wrapper.
    async fn run_active(&self, ctx: CancellationToken) -> Result<(), ServiceError> {
        let child = ctx.child_token();

        let inbound = {
            let service = self.clone();
            let token = child.clone();
            tokio::spawn(async move { service.inbound_loop(token).await })
        };
        let metrics = {
            let service = self.clone();
            let token = child.clone();
            tokio::spawn(async move { service.metric_loop(token).await })
        };

        let result = self.discovery_loop(child.clone()).await;

        child.cancel();
        let _ = inbound.await;
        let _ = metrics.await;
        result
    }

    /// Keep the process snapshot current while active.
    async fn inbound_loop(&self, ctx: CancellationToken) {
        loop {
            let mut inbox = self.inbox.lock().await;
            tokio::select! {
                _ = ctx.cancelled() => return,
                message = inbox.recv() => {
                    drop(inbox);
                    match message {
                        Some(message) => self.apply_message(message),
                        None => return,
                    }
                }
            }
        }
    }

    /// Rebuild the database-identity cache at `update_frequency`, once a
    /// process snapshot has been observed.
    async fn discovery_loop(&self, ctx: CancellationToken) -> Result<(), ServiceError> {
        if !self.config.discovery.enabled {
            ctx.cancelled().await;
            return Ok(());
        }

        // Do not touch the database before the host snapshot confirms
        // anything is there to talk to.
        loop {
            if self.state.lock().processes.is_some() {
                break;
            }
            tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                _ = tokio::time::sleep(Duration::from_secs(1)) => {}
            }
        }

        let mut ticker = tokio::time::interval(self.config.discovery.update_frequency);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                _ = ticker.tick() => {}
            }

            match self.refresh_identity().await {
                Ok(()) => {}
                Err(e) if e.is_connection_fault() => {
                    warn!(workload = %self.kind(), error = %e, "identity refresh skipped");
                    self.deps.usage.record(UsageEvent::Error(e.error_code(self.kind())));
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn refresh_identity(&self) -> Result<(), ServiceError> {
        let conn = self.init_db().await?;
        let result =
            self.workload.discover_identity(conn.as_ref(), self.config.metrics.query_timeout).await;
        conn.close().await;

        // Init faults above keep their connection-fault classification and
        // are retried next tick; a failed identity rebuild on a live
        // connection surfaces as a discovery fault to the recoverable
        // wrapper.
        let identity = result.map_err(|e| ServiceError::Discovery(e.to_string()))?;
        debug!(
            workload = %self.kind(),
            version = %identity.version,
            databases = identity.databases.len(),
            "database identity refreshed"
        );
        *self.identity.lock() = Some(identity);
        Ok(())
    }

    /// Collect and ship on every tick. A tick only starts after the prior
    /// tick's shipments have joined; per-tick failures never exit the loop.
    async fn metric_loop(&self, ctx: CancellationToken) {
        if !self.config.metrics.enabled {
            ctx.cancelled().await;
            return;
        }

        let queries = self.config.metrics.effective_queries(self.kind());
        let mut ticker = tokio::time::interval(self.config.metrics.collection_frequency);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut conn: Option<Box<dyn DatabaseConnection>> = None;

        loop {
            tokio::select! {
                _ = ctx.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if let Err(e) = self.metric_tick(&mut conn, &queries).await {
                warn!(workload = %self.kind(), error = %e, "metric tick failed");
                self.deps.usage.record(UsageEvent::Error(e.error_code(self.kind())));
                // A handle that failed mid-tick is not trusted again.
                if let Some(stale) = conn.take() {
                    stale.close().await;
                }
            }
        }

        if let Some(conn) = conn.take() {
            conn.close().await;
        }
    }

    async fn metric_tick(
        &self,
        conn: &mut Option<Box<dyn DatabaseConnection>>,
        queries: &[Query],
    ) -> Result<(), ServiceError> {
        if conn.is_none() {
            *conn = Some(self.init_db().await?);
        }
        let Some(conn_ref) = conn.as_deref() else {
            return Ok(());
        };

        let timeout = self.config.metrics.query_timeout;
        let role = self.workload.detect_role(conn_ref, timeout).await?;

        let outcome = collect::run_queries(
            conn_ref,
            queries,
            role,
            timeout,
            self.kind(),
            self.deps.usage.as_ref(),
        )
        .await;
        let mut batch = outcome.batch;

        if let Err(e) =
            self.workload.augment(conn_ref, role, &self.deps, timeout, &mut batch).await
        {
            warn!(workload = %self.kind(), error = %e, "workload augmentation skipped");
        }

        if let Some(identity) = self.identity.lock().clone() {
            if !identity.version.is_empty() {
                batch.insert("version", identity.version);
            }
            if !identity.databases.is_empty() {
                batch.insert("database_count", identity.databases.len());
            }
        }

        let mut batches = vec![batch];
        match wa_config::read_override(&self.deps.override_path) {
            Ok(Some(synthetic)) => batches.extend(synthetic),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "metric override file unreadable"),
        }

        let insights = ship::ship_insights(&self.deps, batches).await;
        let points = ship::ship_points(&self.deps, self.kind(), outcome.points).await;
        insights?;
        points
    }

    /// Open a connection: resolve the password, build the data source,
    /// connect, probe. Any failure aborts this init; the next tick retries.
    async fn init_db(&self) -> Result<Box<dyn DatabaseConnection>, ServiceError> {
        let params = &self.config.connection;
        let password = self.resolve_password(params).await?;
        let workload = self.kind();

        let dsn = Dsn {
            workload,
            host: params.host.clone().unwrap_or_else(|| "localhost".to_string()),
            port: params.port.unwrap_or_else(|| Dsn::default_port(workload)),
            username: params.username.clone(),
            password,
            database: params.database.clone(),
            max_connections: self.config.metrics.max_execution_threads,
        };

        let conn = self.deps.connector.connect(&dsn).await.map_err(ServiceError::Connection)?;
        conn.ping().await.map_err(ServiceError::Ping)?;
        Ok(conn)
    }

    /// Inline password first; then a fully-specified secret reference; an
    /// absent or partial reference falls back to an empty password.
    async fn resolve_password(
        &self,
        params: &ConnectionParameters,
    ) -> Result<String, ServiceError> {
        if let Some(password) = &params.password {
            return Ok(password.clone());
        }
        if let Some((project_id, secret_name)) =
            params.secret.as_ref().and_then(|s| s.fully_specified())
        {
            return self
                .deps
                .secrets
                .access(project_id, secret_name)
                .await
                .map_err(ServiceError::Secret);
        }
        Ok(String::new())
    }
}

/// First cell of the only row, as text. Role probes and identity queries
/// lean on this shape.
pub(crate) fn first_text(rows: &QueryRows) -> Option<String> {
    match rows.rows.first().and_then(|row| row.first()) {
        Some(CellValue::Text(s)) => Some(s.clone()),
        Some(CellValue::Int(i)) => Some(i.to_string()),
        Some(CellValue::Float(f)) => Some(f.to_string()),
        Some(CellValue::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}

/// All text cells of one named column.
pub(crate) fn text_column(rows: &QueryRows, column: &str) -> Vec<String> {
    let Some(idx) = rows.column_index(column) else {
        return Vec::new();
    };
    rows.rows
        .iter()
        .filter_map(|row| match row.get(idx) {
            Some(CellValue::Text(s)) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

/// Truthiness of a named cell in the first row.
pub(crate) fn first_bool(rows: &QueryRows, column: &str) -> Option<bool> {
    let idx = rows.column_index(column)?;
    match rows.rows.first().and_then(|row| row.get(idx)) {
        Some(CellValue::Bool(b)) => Some(*b),
        Some(CellValue::Int(i)) => Some(*i != 0),
        Some(CellValue::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "t" | "true" | "on" | "1" => Some(true),
            "f" | "false" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
