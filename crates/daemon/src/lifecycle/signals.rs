// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OS signal handling: one shutdown edge, whatever the signal.

use crate::error::DaemonError;

/// Resolve when an interrupt, terminate or hangup signal arrives.
#[cfg(unix)]
pub async fn wait_for_shutdown() -> Result<(), DaemonError> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt()).map_err(DaemonError::Signal)?;
    let mut terminate = signal(SignalKind::terminate()).map_err(DaemonError::Signal)?;
    let mut hangup = signal(SignalKind::hangup()).map_err(DaemonError::Signal)?;

    tokio::select! {
        _ = interrupt.recv() => {}
        _ = terminate.recv() => {}
        _ = hangup.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown() -> Result<(), DaemonError> {
    tokio::signal::ctrl_c().await.map_err(DaemonError::Signal)
}
