// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wa startdaemon` - run the agent in the foreground until signalled.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wa_adapters::{
    HostProcessLister, JsonlUsageSink, RestInsightClient, RestSecretResolver,
    RestTimeSeriesClient, SqlxConnector, SystemNameResolver, UsageEvent, UsageSink,
};
use wa_config::AgentConfig;
use wa_core::ErrorCode;
use wa_daemon::{Daemon, DaemonDeps};

const DEFAULT_DATA_WAREHOUSE_ENDPOINT: &str =
    "https://workloadmanager-datawarehouse.googleapis.com/v1/insights:write";
const DEFAULT_TIMESERIES_ENDPOINT: &str =
    "https://monitoring.googleapis.com/v3/timeSeries:write";
const SECRET_STORE_ENDPOINT: &str = "https://secretmanager.googleapis.com";

pub async fn run(config_path: Option<PathBuf>) -> Result<()> {
    let path = config_path.unwrap_or_else(crate::default_config_path);
    let config = match AgentConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            let usage = JsonlUsageSink::new(wa_daemon::env::metrics_dir());
            usage.record(UsageEvent::Error(ErrorCode::ConfigFileRead));
            return Err(anyhow::Error::new(e).context("configuration load failed"));
        }
    };

    let _log_guard = init_tracing(&config)?;
    info!(
        config = %path.display(),
        version = env!("CARGO_PKG_VERSION"),
        "workload agent starting"
    );

    let deps = build_deps(&config)?;
    Daemon::new(config, deps).run().await?;
    Ok(())
}

/// File-based structured logging under the agent state directory. The
/// guard must stay alive until exit so buffered lines flush.
fn init_tracing(config: &AgentConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = wa_daemon::env::log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&log_dir, "workload-agent.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

/// Production adapter wiring.
fn build_deps(config: &AgentConfig) -> Result<DaemonDeps> {
    let warehouse = config
        .data_warehouse_endpoint
        .clone()
        .unwrap_or_else(|| DEFAULT_DATA_WAREHOUSE_ENDPOINT.to_string());

    Ok(DaemonDeps {
        lister: Arc::new(HostProcessLister),
        connector: Arc::new(SqlxConnector),
        secrets: Arc::new(RestSecretResolver::new(SECRET_STORE_ENDPOINT.to_string(), None)),
        insights: Arc::new(RestInsightClient::new(warehouse)),
        timeseries: Arc::new(RestTimeSeriesClient::new(DEFAULT_TIMESERIES_ENDPOINT.to_string())),
        resolver: Arc::new(
            SystemNameResolver::from_system_conf().context("DNS resolver unavailable")?,
        ),
        usage: Arc::new(JsonlUsageSink::new(wa_daemon::env::metrics_dir())),
    })
}
