// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host process enumeration.
//!
//! The fan-out asks for the whole table on a slow timer; each call takes a
//! fresh snapshot rather than keeping a refreshed system handle alive.

use std::sync::Arc;

use wa_core::{ProcessError, ProcessHandle};

use crate::error::AdapterError;

/// Lists the processes running on this host.
pub trait ProcessLister: Send + Sync {
    fn list(&self) -> Result<Vec<Arc<dyn ProcessHandle>>, AdapterError>;
}

/// One process captured from the host table.
///
/// Attributes are copied out eagerly; lookups that already failed at
/// snapshot time (a process exiting mid-scan, an unmapped uid) surface as
/// [`ProcessError::Unavailable`] from the accessors.
#[derive(Debug)]
struct HostProcess {
    pid: u32,
    name: String,
    username: Option<String>,
    cmdline: String,
    environ: Vec<String>,
}

impl ProcessHandle for HostProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn name(&self) -> Result<String, ProcessError> {
        Ok(self.name.clone())
    }

    fn username(&self) -> Result<String, ProcessError> {
        self.username
            .clone()
            .ok_or_else(|| ProcessError::Unavailable(format!("no user for pid {}", self.pid)))
    }

    fn cmdline(&self) -> Result<String, ProcessError> {
        Ok(self.cmdline.clone())
    }

    fn environ(&self) -> Result<Vec<String>, ProcessError> {
        Ok(self.environ.clone())
    }
}

/// Production lister over the `sysinfo` process table.
#[derive(Default)]
pub struct HostProcessLister;

impl ProcessLister for HostProcessLister {
    fn list(&self) -> Result<Vec<Arc<dyn ProcessHandle>>, AdapterError> {
        use sysinfo::{ProcessRefreshKind, RefreshKind, System, Users};

        let system = System::new_with_specifics(
            RefreshKind::new().with_processes(ProcessRefreshKind::everything()),
        );
        let users = Users::new_with_refreshed_list();

        let mut processes: Vec<Arc<dyn ProcessHandle>> = Vec::new();
        for (pid, process) in system.processes() {
            let username = process
                .user_id()
                .and_then(|uid| users.get_user_by_id(uid))
                .map(|user| user.name().to_string());
            processes.push(Arc::new(HostProcess {
                pid: pid.as_u32(),
                name: process.name().to_string(),
                username,
                cmdline: process.cmd().join(" "),
                environ: process.environ().to_vec(),
            }));
        }

        if processes.is_empty() {
            return Err(AdapterError::ProcessList("process table is empty".to_string()));
        }
        Ok(processes)
    }
}

/// Deterministic process for tests.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone)]
pub struct FakeProcess {
    pub pid: u32,
    pub name: String,
    pub username: String,
    pub cmdline: String,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeProcess {
    pub fn named(pid: u32, name: &str) -> Self {
        Self {
            pid,
            name: name.to_string(),
            username: "daemon".to_string(),
            cmdline: format!("/usr/sbin/{name}"),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl ProcessHandle for FakeProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn name(&self) -> Result<String, ProcessError> {
        Ok(self.name.clone())
    }

    fn username(&self) -> Result<String, ProcessError> {
        Ok(self.username.clone())
    }

    fn cmdline(&self) -> Result<String, ProcessError> {
        Ok(self.cmdline.clone())
    }

    fn environ(&self) -> Result<Vec<String>, ProcessError> {
        Ok(vec![])
    }
}

/// Scriptable lister: a queue of results, one per `list` call. The last
/// entry repeats once the queue drains.
#[cfg(any(test, feature = "test-support"))]
pub struct FakeProcessLister {
    snapshots: parking_lot::Mutex<Vec<Result<Vec<FakeProcess>, String>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeProcessLister {
    pub fn with_processes(processes: Vec<FakeProcess>) -> Self {
        Self { snapshots: parking_lot::Mutex::new(vec![Ok(processes)]) }
    }

    pub fn failing(reason: &str) -> Self {
        Self { snapshots: parking_lot::Mutex::new(vec![Err(reason.to_string())]) }
    }

    pub fn with_script(snapshots: Vec<Result<Vec<FakeProcess>, String>>) -> Self {
        Self { snapshots: parking_lot::Mutex::new(snapshots) }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl ProcessLister for FakeProcessLister {
    fn list(&self) -> Result<Vec<Arc<dyn ProcessHandle>>, AdapterError> {
        let mut snapshots = self.snapshots.lock();
        let next = if snapshots.len() > 1 {
            snapshots.remove(0)
        } else {
            snapshots.first().cloned().unwrap_or_else(|| Err("script exhausted".to_string()))
        };
        match next {
            Ok(processes) => Ok(processes
                .into_iter()
                .map(|p| Arc::new(p) as Arc<dyn ProcessHandle>)
                .collect()),
            Err(reason) => Err(AdapterError::ProcessList(reason)),
        }
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
