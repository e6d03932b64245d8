// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Usage-metric sink.
//!
//! Lifecycle and failure events are appended to a JSONL file at
//! `<metrics_dir>/usage.jsonl` so operators can see what the agent has
//! been doing without trawling the log. The sink must never fail the
//! caller; write errors are logged and dropped.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use wa_core::ErrorCode;

/// Maximum usage file size before rotation (10 MB).
const MAX_USAGE_SIZE: u64 = 10 * 1024 * 1024;

/// Number of rotated files to keep (usage.jsonl.1, .2, .3).
const MAX_ROTATED_FILES: u32 = 3;

/// One datapoint the agent reports about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageEvent {
    /// Process came up with a valid configuration.
    Started,
    /// Periodic heartbeat while healthy.
    Running,
    /// A distinct failure class occurred.
    Error(ErrorCode),
}

/// Thread-safe sink for usage events.
pub trait UsageSink: Send + Sync {
    fn record(&self, event: UsageEvent);
}

/// A single record written to the JSONL usage file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UsageRecord {
    timestamp: String,
    event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<u16>,
    agent_version: String,
}

/// Append-only JSONL sink with size-based rotation.
pub struct JsonlUsageSink {
    metrics_dir: PathBuf,
    // Serializes append+rotate across tasks
    write_lock: Mutex<()>,
}

impl JsonlUsageSink {
    pub fn new(metrics_dir: PathBuf) -> Self {
        Self { metrics_dir, write_lock: Mutex::new(()) }
    }

    fn build_record(event: UsageEvent) -> UsageRecord {
        let (name, code) = match event {
            UsageEvent::Started => ("started", None),
            UsageEvent::Running => ("running", None),
            UsageEvent::Error(code) => ("error", Some(code.code())),
        };
        UsageRecord {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            event: name.to_string(),
            error_code: code,
            agent_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn append(&self, record: &UsageRecord) -> Result<(), std::io::Error> {
        let path = self.metrics_dir.join("usage.jsonl");
        fs::create_dir_all(&self.metrics_dir)?;

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Rotate the usage file if it exceeds the size limit.
    fn rotate_if_needed(&self) {
        let path = self.metrics_dir.join("usage.jsonl");
        let size = match fs::metadata(&path) {
            Ok(m) => m.len(),
            Err(_) => return,
        };

        if size < MAX_USAGE_SIZE {
            return;
        }

        let path_str = path.display().to_string();

        // Shift older rotations: .3 is deleted, .2 -> .3, .1 -> .2
        for i in (1..MAX_ROTATED_FILES).rev() {
            let from = format!("{path_str}.{i}");
            let to = format!("{path_str}.{}", i + 1);
            let _ = fs::rename(&from, &to);
        }
        let _ = fs::rename(&path, format!("{path_str}.1"));
    }
}

impl UsageSink for JsonlUsageSink {
    fn record(&self, event: UsageEvent) {
        let record = Self::build_record(event);
        let _guard = self.write_lock.lock();
        self.rotate_if_needed();
        if let Err(e) = self.append(&record) {
            tracing::warn!(error = %e, "usage record write failed");
        }
    }
}

/// Counts events for assertions.
#[cfg(any(test, feature = "test-support"))]
pub struct FakeUsageSink {
    pub events: Mutex<Vec<UsageEvent>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeUsageSink {
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self { events: Mutex::new(Vec::new()) })
    }

    pub fn count(&self, event: UsageEvent) -> usize {
        self.events.lock().iter().filter(|e| **e == event).count()
    }

    pub fn error_count(&self, code: ErrorCode) -> usize {
        self.count(UsageEvent::Error(code))
    }
}

#[cfg(any(test, feature = "test-support"))]
impl UsageSink for FakeUsageSink {
    fn record(&self, event: UsageEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
#[path = "usage_tests.rs"]
mod tests;
