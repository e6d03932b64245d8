// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-discovery fan-out.
//!
//! One producer scans the host process table on a slow timer and multicasts
//! the snapshot to every workload service over bounded channels. Sends are
//! non-blocking: a stuck consumer costs one dropped snapshot, never a stall
//! of the other services. Dropping is safe because presence only needs to
//! latch once.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use wa_core::{DiscoveryMessage, DiscoveryOrigin};

use wa_adapters::ProcessLister;

use crate::error::ServiceError;

/// Per-service inbound channel capacity.
pub const DISCOVERY_CHANNEL_CAPACITY: usize = 1;

pub struct ProcessFanout {
    lister: Arc<dyn ProcessLister>,
    subscribers: Vec<mpsc::Sender<DiscoveryMessage>>,
    period: Duration,
}

impl ProcessFanout {
    pub fn new(
        lister: Arc<dyn ProcessLister>,
        subscribers: Vec<mpsc::Sender<DiscoveryMessage>>,
        period: Duration,
    ) -> Self {
        Self { lister, subscribers, period }
    }

    /// Scan immediately, then on every tick until cancelled.
    ///
    /// A listing failure (including an empty process table) terminates the
    /// fan-out; whether it comes back is the recoverable wrapper's call.
    pub async fn run(self, ctx: CancellationToken) -> Result<(), ServiceError> {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                _ = ticker.tick() => {}
            }

            let processes = match self.lister.list() {
                Ok(processes) if processes.is_empty() => {
                    error!("process table is empty, stopping discovery");
                    return Err(ServiceError::EmptyProcessTable);
                }
                Ok(processes) => processes,
                Err(e) => {
                    error!(error = %e, "process listing failed, stopping discovery");
                    return Err(ServiceError::ProcessList(e));
                }
            };

            let message =
                DiscoveryMessage { origin: DiscoveryOrigin::ProcessDiscovery, processes };
            let mut full = 0usize;
            for subscriber in &self.subscribers {
                match subscriber.try_send(message.clone()) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => full += 1,
                    // A closed channel is a service that declined to run.
                    Err(mpsc::error::TrySendError::Closed(_)) => {}
                }
            }

            if full > 0 {
                warn!(full, "discovery snapshot dropped on full channels");
            }
            debug!(
                processes = message.processes.len(),
                subscribers = self.subscribers.len(),
                "process snapshot delivered"
            );
        }
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
