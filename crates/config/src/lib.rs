// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wa-config: the on-disk configuration document.
//!
//! The agent reads a single TOML file at startup. Everything in it is
//! immutable for the life of the process; the `configure` CLI rewrites the
//! file and the operator restarts the daemon. Query tables ship as data in
//! the same document, with built-in defaults per workload.

pub mod agent;
pub mod defaults;
pub mod duration;
pub mod override_file;
pub mod workload;

pub use agent::{AgentConfig, CommonDiscovery, ConfigError, LogLevel};
pub use defaults::default_queries;
pub use duration::{format_duration, parse_duration};
pub use override_file::{parse_override, read_override};
pub use workload::{
    ConnectionParameters, DiscoveryConfig, MetricsConfig, SecretRef, WorkloadConfig,
};
