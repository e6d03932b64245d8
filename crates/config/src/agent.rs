// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level configuration document.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wa_core::{CloudProperties, WorkloadType};

use crate::defaults;
use crate::duration::serde_str;
use crate::workload::WorkloadConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: Box<toml::de::Error> },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config file {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },

    #[error("invalid duration: {0}")]
    InvalidDuration(String),
}

/// Minimum log severity written to the sinks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Directive understood by the tracing env-filter.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Settings of the shared process-discovery fan-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonDiscovery {
    #[serde(default = "defaults::process_discovery_frequency", with = "serde_str")]
    pub collection_frequency: Duration,
}

impl Default for CommonDiscovery {
    fn default() -> Self {
        Self { collection_frequency: defaults::process_discovery_frequency() }
    }
}

/// The agent configuration, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub log_to_cloud: bool,
    // Plain values stay ahead of the table-valued sections so the saved
    // document serializes in TOML order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_warehouse_endpoint: Option<String>,
    #[serde(default)]
    pub cloud_properties: CloudProperties,
    #[serde(default)]
    pub common_discovery: CommonDiscovery,

    #[serde(default)]
    pub oracle: WorkloadConfig,
    #[serde(default)]
    pub mysql: WorkloadConfig,
    #[serde(default)]
    pub postgres: WorkloadConfig,
    #[serde(default)]
    pub redis: WorkloadConfig,
    #[serde(default)]
    pub mongodb: WorkloadConfig,
    #[serde(default)]
    pub sqlserver: WorkloadConfig,
}

impl AgentConfig {
    /// Load and validate the document. Any fault here is fatal at startup.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source: Box::new(source) })
    }

    /// Write the document back, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })?;
        }
        std::fs::write(path, content)
            .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })
    }

    /// The section for a concrete workload; `Unknown` has none.
    pub fn workload(&self, workload: WorkloadType) -> Option<&WorkloadConfig> {
        match workload {
            WorkloadType::Oracle => Some(&self.oracle),
            WorkloadType::Mysql => Some(&self.mysql),
            WorkloadType::Postgres => Some(&self.postgres),
            WorkloadType::Redis => Some(&self.redis),
            WorkloadType::Mongodb => Some(&self.mongodb),
            WorkloadType::Sqlserver => Some(&self.sqlserver),
            WorkloadType::Unknown => None,
        }
    }

    pub fn workload_mut(&mut self, workload: WorkloadType) -> Option<&mut WorkloadConfig> {
        match workload {
            WorkloadType::Oracle => Some(&mut self.oracle),
            WorkloadType::Mysql => Some(&mut self.mysql),
            WorkloadType::Postgres => Some(&mut self.postgres),
            WorkloadType::Redis => Some(&mut self.redis),
            WorkloadType::Mongodb => Some(&mut self.mongodb),
            WorkloadType::Sqlserver => Some(&mut self.sqlserver),
            WorkloadType::Unknown => None,
        }
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
