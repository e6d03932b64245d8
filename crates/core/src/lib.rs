// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wa-core: domain types for the workload agent.
//!
//! Everything the supervisor, the collection pipeline and the shippers
//! agree on lives here: workload identities, the declarative query model,
//! metric batches, discovery messages and the error-code taxonomy.

pub mod cloud;
pub mod discovery;
pub mod enablement;
pub mod error_code;
pub mod metrics;
pub mod query;
pub mod units;
pub mod workload;

pub use cloud::CloudProperties;
pub use discovery::{DatabaseIdentity, DiscoveryMessage, DiscoveryOrigin, ProcessError, ProcessHandle};
pub use enablement::Enablement;
pub use error_code::ErrorCode;
pub use metrics::{MetricPoint, MetricValue, WorkloadMetrics};
pub use query::{ColumnSpec, DatabaseRole, MetricType, Normalize, Query, ValueType};
pub use units::{parse_memory_bytes, zone_from_fqdn, UnitError};
pub use workload::WorkloadType;
