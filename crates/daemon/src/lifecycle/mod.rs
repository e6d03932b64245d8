// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: startup, supervision, shutdown.

mod signals;
pub use signals::wait_for_shutdown;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use wa_adapters::{
    DatabaseConnector, InsightClient, NameResolver, ProcessLister, SecretResolver,
    TimeSeriesClient, UsageEvent, UsageSink,
};
use wa_config::AgentConfig;
use wa_core::{ErrorCode, WorkloadType};

use crate::discovery::{ProcessFanout, DISCOVERY_CHANNEL_CAPACITY};
use crate::env;
use crate::error::DaemonError;
use crate::recoverable::{RecoverableRoutine, EXPECTED_MIN_DURATION};
use crate::service::{
    MongodbWorkload, MysqlWorkload, OracleWorkload, PostgresWorkload, RedisWorkload,
    ServiceDeps, SqlserverWorkload, Workload, WorkloadService,
};

/// Heartbeat period for the `running` usage datapoint.
const HEARTBEAT_PERIOD: Duration = Duration::from_secs(24 * 3600);

/// Adapter bundle the CLI (or a test harness) wires in.
pub struct DaemonDeps {
    pub lister: Arc<dyn ProcessLister>,
    pub connector: Arc<dyn DatabaseConnector>,
    pub secrets: Arc<dyn SecretResolver>,
    pub insights: Arc<dyn InsightClient>,
    pub timeseries: Arc<dyn TimeSeriesClient>,
    pub resolver: Arc<dyn NameResolver>,
    pub usage: Arc<dyn UsageSink>,
}

/// The supervisor.
pub struct Daemon {
    config: AgentConfig,
    deps: DaemonDeps,
}

impl Daemon {
    pub fn new(config: AgentConfig, deps: DaemonDeps) -> Self {
        Self { config, deps }
    }

    /// Spawn the fan-out, all six workload services and the heartbeat
    /// under recoverable routines. Returns the spawned handles; cancelling
    /// `ctx` winds everything down.
    pub fn start(&self, ctx: &CancellationToken) -> Vec<JoinHandle<()>> {
        self.deps.usage.record(UsageEvent::Started);

        let service_deps = Arc::new(ServiceDeps {
            connector: Arc::clone(&self.deps.connector),
            secrets: Arc::clone(&self.deps.secrets),
            insights: Arc::clone(&self.deps.insights),
            timeseries: Arc::clone(&self.deps.timeseries),
            resolver: Arc::clone(&self.deps.resolver),
            usage: Arc::clone(&self.deps.usage),
            cloud: self.config.cloud_properties.clone(),
            override_path: env::override_path(),
        });

        let mut handles = Vec::new();
        let mut subscribers = Vec::new();

        for workload in WorkloadType::ALL {
            let Some(config) = self.config.workload(workload) else {
                continue;
            };
            let (tx, rx) = mpsc::channel(DISCOVERY_CHANNEL_CAPACITY);
            subscribers.push(tx);

            let config = config.clone();
            let deps = Arc::clone(&service_deps);
            handles.push(match workload {
                WorkloadType::Oracle => spawn_service(OracleWorkload, config, deps, rx, ctx),
                WorkloadType::Mysql => spawn_service(MysqlWorkload, config, deps, rx, ctx),
                WorkloadType::Postgres => spawn_service(PostgresWorkload, config, deps, rx, ctx),
                WorkloadType::Redis => spawn_service(RedisWorkload, config, deps, rx, ctx),
                WorkloadType::Mongodb => spawn_service(MongodbWorkload, config, deps, rx, ctx),
                WorkloadType::Sqlserver => spawn_service(SqlserverWorkload, config, deps, rx, ctx),
                WorkloadType::Unknown => continue,
            });
        }

        // One fan-out per agent, feeding every service channel.
        let lister = Arc::clone(&self.deps.lister);
        let period = self.config.common_discovery.collection_frequency;
        let fanout = RecoverableRoutine {
            name: "process-discovery".to_string(),
            error_code: ErrorCode::ProcessDiscovery,
            expected_min_duration: EXPECTED_MIN_DURATION,
            usage: Arc::clone(&self.deps.usage),
            body: move |token: CancellationToken| {
                let fanout =
                    ProcessFanout::new(Arc::clone(&lister), subscribers.clone(), period);
                fanout.run(token)
            },
        };
        handles.push(fanout.spawn(ctx.clone()));

        handles.push(tokio::spawn(heartbeat(ctx.clone(), Arc::clone(&self.deps.usage))));

        info!(services = WorkloadType::ALL.len(), "supervisor started");
        handles
    }

    /// Run to completion: start everything, wait for a shutdown signal,
    /// cancel the root token and drain briefly. No join on children is
    /// needed; every loop observes the token each iteration.
    pub async fn run(self) -> Result<(), DaemonError> {
        let ctx = CancellationToken::new();
        let _handles = self.start(&ctx);

        wait_for_shutdown().await?;
        info!("shutdown signal received");
        ctx.cancel();

        tokio::time::sleep(env::drain_timeout()).await;
        info!("daemon exiting");
        Ok(())
    }
}

fn spawn_service<W: Workload>(
    workload: W,
    config: wa_config::WorkloadConfig,
    deps: Arc<ServiceDeps>,
    inbox: mpsc::Receiver<wa_core::DiscoveryMessage>,
    ctx: &CancellationToken,
) -> JoinHandle<()> {
    let kind = workload.workload_type();
    let usage = Arc::clone(&deps.usage);
    let service = WorkloadService::new(workload, config, deps, inbox);

    let routine = RecoverableRoutine {
        name: format!("{kind}-service"),
        error_code: ErrorCode::for_workload(kind),
        expected_min_duration: EXPECTED_MIN_DURATION,
        usage,
        body: move |token: CancellationToken| {
            let service = service.clone();
            async move { service.start(token).await }
        },
    };
    routine.spawn(ctx.clone())
}

/// Daily `running` datapoint while healthy. The immediate first tick is
/// discarded; startup is already recorded.
async fn heartbeat(ctx: CancellationToken, usage: Arc<dyn UsageSink>) {
    let mut ticker = tokio::time::interval(HEARTBEAT_PERIOD);
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ctx.cancelled() => return,
            _ = ticker.tick() => usage.record(UsageEvent::Running),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
