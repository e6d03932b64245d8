// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-workload configuration sections.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wa_core::{Enablement, Query, WorkloadType};

use crate::defaults;
use crate::duration::serde_str;

/// Configuration for one workload service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Tri-state: `true` starts the service immediately, `false` disables
    /// it, an absent key waits for the workload to appear on the host.
    #[serde(default, with = "enablement_serde", skip_serializing_if = "Enablement::is_auto")]
    pub enabled: Enablement,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub connection: ConnectionParameters,
}

/// Database-identity discovery loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,
    #[serde(default = "defaults::discovery_update_frequency", with = "serde_str")]
    pub update_frequency: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            update_frequency: defaults::discovery_update_frequency(),
        }
    }
}

/// Metric collection loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,
    #[serde(default = "defaults::collection_frequency", with = "serde_str")]
    pub collection_frequency: Duration,
    #[serde(default = "defaults::query_timeout", with = "serde_str")]
    pub query_timeout: Duration,
    #[serde(default = "defaults::max_execution_threads")]
    pub max_execution_threads: u32,
    /// Declarative query table. Empty selects the built-in table for the
    /// workload.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queries: Vec<Query>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            collection_frequency: defaults::collection_frequency(),
            query_timeout: defaults::query_timeout(),
            max_execution_threads: defaults::max_execution_threads(),
            queries: Vec::new(),
        }
    }
}

impl MetricsConfig {
    /// The effective query table for `workload`.
    pub fn effective_queries(&self, workload: WorkloadType) -> Vec<Query> {
        if self.queries.is_empty() {
            defaults::default_queries(workload)
        } else {
            self.queries.clone()
        }
    }
}

/// How the service reaches its database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionParameters {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretRef>,
}

/// Reference into the hosted secret store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub secret_name: String,
}

impl SecretRef {
    /// A reference missing either field is treated as not configured, not
    /// as an error.
    pub fn fully_specified(&self) -> Option<(&str, &str)> {
        if self.project_id.is_empty() || self.secret_name.is_empty() {
            None
        } else {
            Some((&self.project_id, &self.secret_name))
        }
    }
}

mod enablement_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use wa_core::Enablement;

    pub fn serialize<S: Serializer>(e: &Enablement, s: S) -> Result<S::Ok, S::Error> {
        match e.as_option() {
            Some(b) => s.serialize_bool(b),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Enablement, D::Error> {
        let value = Option::<bool>::deserialize(d)?;
        Ok(Enablement::from_option(value))
    }
}

#[cfg(test)]
#[path = "workload_tests.rs"]
mod tests;
