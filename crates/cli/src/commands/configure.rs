// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wa configure <workload>` - read-modify-write the configuration file.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;

use wa_config::{parse_duration, AgentConfig, SecretRef};
use wa_core::{Enablement, WorkloadType};

#[derive(Args)]
pub struct ConfigureArgs {
    /// Workload to configure (oracle, mysql, postgres, redis, mongodb, sqlserver)
    pub workload: String,

    /// enable | disable | auto
    pub action: Option<String>,

    /// Path to the configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long)]
    pub database: Option<String>,

    /// Secret-store project for password retrieval
    #[arg(long)]
    pub secret_project: Option<String>,
    /// Secret-store name for password retrieval
    #[arg(long)]
    pub secret_name: Option<String>,

    #[arg(long)]
    pub metrics_enabled: Option<bool>,
    /// Metric collection frequency (e.g. "5m")
    #[arg(long)]
    pub metrics_frequency: Option<String>,
    /// Per-query deadline (e.g. "10s")
    #[arg(long)]
    pub query_timeout: Option<String>,

    #[arg(long)]
    pub discovery_enabled: Option<bool>,
    /// Database discovery frequency (e.g. "10m")
    #[arg(long)]
    pub discovery_frequency: Option<String>,
}

pub fn run(args: ConfigureArgs) -> Result<()> {
    let path = args.config.clone().unwrap_or_else(crate::default_config_path);
    let mut config =
        if path.exists() { AgentConfig::load(&path)? } else { AgentConfig::default() };

    let workload = parse_workload(&args.workload)?;
    apply(&mut config, workload, &args)?;

    config.save(&path).context("configuration write failed")?;
    println!("updated {} configuration in {}", workload, path.display());
    Ok(())
}

fn parse_workload(name: &str) -> Result<WorkloadType> {
    match name.trim().to_ascii_lowercase().as_str() {
        "oracle" => Ok(WorkloadType::Oracle),
        "mysql" => Ok(WorkloadType::Mysql),
        "postgres" | "postgresql" => Ok(WorkloadType::Postgres),
        "redis" => Ok(WorkloadType::Redis),
        "mongodb" | "mongo" => Ok(WorkloadType::Mongodb),
        "sqlserver" | "mssql" => Ok(WorkloadType::Sqlserver),
        other => bail!("unknown workload: {other}"),
    }
}

fn apply(config: &mut AgentConfig, workload: WorkloadType, args: &ConfigureArgs) -> Result<()> {
    let section = config
        .workload_mut(workload)
        .ok_or_else(|| anyhow!("{workload} has no configuration section"))?;

    match args.action.as_deref() {
        Some("enable") => section.enabled = Enablement::Enabled,
        Some("disable") => section.enabled = Enablement::Disabled,
        Some("auto") => section.enabled = Enablement::Auto,
        Some(other) => bail!("unknown action: {other} (expected enable, disable or auto)"),
        None => {}
    }

    if let Some(username) = &args.username {
        section.connection.username = username.clone();
    }
    if let Some(password) = &args.password {
        section.connection.password = Some(password.clone());
    }
    if let Some(host) = &args.host {
        section.connection.host = Some(host.clone());
    }
    if let Some(port) = args.port {
        section.connection.port = Some(port);
    }
    if let Some(database) = &args.database {
        section.connection.database = Some(database.clone());
    }

    if args.secret_project.is_some() || args.secret_name.is_some() {
        let secret = section.connection.secret.get_or_insert_with(SecretRef::default);
        if let Some(project) = &args.secret_project {
            secret.project_id = project.clone();
        }
        if let Some(name) = &args.secret_name {
            secret.secret_name = name.clone();
        }
    }

    if let Some(enabled) = args.metrics_enabled {
        section.metrics.enabled = enabled;
    }
    if let Some(frequency) = &args.metrics_frequency {
        section.metrics.collection_frequency =
            parse_duration(frequency).map_err(|e| anyhow!("--metrics-frequency: {e}"))?;
    }
    if let Some(timeout) = &args.query_timeout {
        section.metrics.query_timeout =
            parse_duration(timeout).map_err(|e| anyhow!("--query-timeout: {e}"))?;
    }

    if let Some(enabled) = args.discovery_enabled {
        section.discovery.enabled = enabled;
    }
    if let Some(frequency) = &args.discovery_frequency {
        section.discovery.update_frequency =
            parse_duration(frequency).map_err(|e| anyhow!("--discovery-frequency: {e}"))?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "configure_tests.rs"]
mod tests;
