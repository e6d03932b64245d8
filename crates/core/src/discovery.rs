// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Discovery messages multicast from the process fan-out to the workload
//! services, and the database identity a service discovers once active.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who produced a discovery snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryOrigin {
    ProcessDiscovery,
    DataWarehouseActivation,
}

/// Process lookups race with process exit; accessors are fallible.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("process {0} exited during lookup")]
    Gone(u32),
    #[error("process attribute unavailable: {0}")]
    Unavailable(String),
}

/// A handle onto one running process.
///
/// The real implementation wraps the host's process-enumeration facility;
/// tests substitute a deterministic list.
pub trait ProcessHandle: Send + Sync + fmt::Debug {
    fn pid(&self) -> u32;
    fn name(&self) -> Result<String, ProcessError>;
    fn username(&self) -> Result<String, ProcessError>;
    fn cmdline(&self) -> Result<String, ProcessError>;
    fn environ(&self) -> Result<Vec<String>, ProcessError>;
}

/// One snapshot of the host process table.
#[derive(Clone)]
pub struct DiscoveryMessage {
    pub origin: DiscoveryOrigin,
    pub processes: Vec<Arc<dyn ProcessHandle>>,
}

impl fmt::Debug for DiscoveryMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveryMessage")
            .field("origin", &self.origin)
            .field("processes", &self.processes.len())
            .finish()
    }
}

/// Identity of the database instance behind an active workload service.
///
/// Rebuilt by the service's discovery loop; read-only to the metric loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseIdentity {
    pub instance_name: String,
    pub version: String,
    pub databases: Vec<String>,
}
