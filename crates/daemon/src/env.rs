// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

/// Resolve state directory: WA_STATE_DIR > XDG_STATE_HOME/wa > ~/.local/state/wa
///
/// Falls back to `/var/lib/workload-agent` when no home is available
/// (service-manager environments).
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("WA_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("wa");
    }
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".local/state/wa"),
        Err(_) => PathBuf::from("/var/lib/workload-agent"),
    }
}

/// Directory holding the usage-metric JSONL files.
pub fn metrics_dir() -> PathBuf {
    state_dir().join("metrics")
}

/// Directory for the daemon's own log files.
pub fn log_dir() -> PathBuf {
    state_dir().join("logs")
}

/// Shutdown drain interval (default 3s, configurable via `WA_DRAIN_TIMEOUT_MS`).
pub fn drain_timeout() -> Duration {
    std::env::var("WA_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(3))
}

/// The diagnostic metric-override file, read on every collection tick.
pub fn override_path() -> PathBuf {
    std::env::var("WA_METRIC_OVERRIDE_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/etc/workload-agent/metricoverride.yaml"))
}
