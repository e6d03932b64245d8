// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wa-adapters: everything the agent talks to that is not the agent.
//!
//! Each external collaborator — the host process table, database drivers,
//! the secret store, the warehouse and time-series endpoints, DNS, the
//! usage-metric sink — is named by a trait here, with a production
//! implementation next to it. Deterministic fakes ship under the
//! `test-support` feature for other crates' tests.

pub mod database;
pub mod error;
pub mod insight;
pub mod process;
pub mod resolver;
pub mod secret;
pub mod timeseries;
pub mod usage;

pub use database::{CellValue, DatabaseConnection, DatabaseConnector, Dsn, QueryRows, SqlxConnector};
pub use error::AdapterError;
pub use insight::{InsightClient, RestInsightClient, WorkloadValidation, WriteInsightRequest};
pub use process::{HostProcessLister, ProcessLister};
pub use resolver::{NameResolver, SystemNameResolver};
pub use secret::{RestSecretResolver, SecretResolver};
pub use timeseries::{RestTimeSeriesClient, TimeSeriesClient};
pub use usage::{JsonlUsageSink, UsageEvent, UsageSink};

#[cfg(any(test, feature = "test-support"))]
pub use database::FakeDatabase;
#[cfg(any(test, feature = "test-support"))]
pub use insight::FakeInsightClient;
#[cfg(any(test, feature = "test-support"))]
pub use process::{FakeProcess, FakeProcessLister};
#[cfg(any(test, feature = "test-support"))]
pub use resolver::FakeNameResolver;
#[cfg(any(test, feature = "test-support"))]
pub use secret::FakeSecretResolver;
#[cfg(any(test, feature = "test-support"))]
pub use timeseries::FakeTimeSeriesClient;
#[cfg(any(test, feature = "test-support"))]
pub use usage::FakeUsageSink;
