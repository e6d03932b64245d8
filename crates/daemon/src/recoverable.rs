// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recoverable routine: crash capture with bounded restart.
//!
//! A routine that fails after running a while is restarted under the same
//! token; one that fails quickly is declared permanently broken so a tight
//! crash-loop cannot masquerade as a sequence of healthy restarts.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use wa_adapters::{UsageEvent, UsageSink};
use wa_core::ErrorCode;

use crate::error::ServiceError;

/// A body must survive at least this long for a restart to be granted.
pub const EXPECTED_MIN_DURATION: Duration = Duration::from_secs(20);

/// A respawnable task body plus its reporting identity.
pub struct RecoverableRoutine<F> {
    pub name: String,
    pub error_code: ErrorCode,
    pub expected_min_duration: Duration,
    pub usage: Arc<dyn UsageSink>,
    /// Factory invoked once per attempt.
    pub body: F,
}

impl<F, Fut> RecoverableRoutine<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ServiceError>> + Send + 'static,
{
    pub fn spawn(self, ctx: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(ctx).await })
    }

    async fn run(self, ctx: CancellationToken) {
        loop {
            let started = Instant::now();
            // Each attempt runs in its own task so a panic is contained
            // and observable through the join error.
            let attempt = tokio::spawn((self.body)(ctx.clone()));
            let outcome = attempt.await;

            if ctx.is_cancelled() {
                return;
            }

            match outcome {
                Ok(Ok(())) => {
                    info!(routine = %self.name, "routine exited cleanly");
                    return;
                }
                Ok(Err(e)) => {
                    error!(routine = %self.name, error = %e, code = %self.error_code, "routine failed");
                    self.usage.record(UsageEvent::Error(self.error_code));
                }
                Err(join_err) if join_err.is_panic() => {
                    error!(routine = %self.name, code = %self.error_code, "routine panicked");
                    self.usage.record(UsageEvent::Error(self.error_code));
                }
                Err(_) => return,
            }

            if started.elapsed() < self.expected_min_duration {
                error!(
                    routine = %self.name,
                    min_duration = ?self.expected_min_duration,
                    "routine failed too quickly, giving up"
                );
                return;
            }
            info!(routine = %self.name, "restarting routine");
        }
    }
}

#[cfg(test)]
#[path = "recoverable_tests.rs"]
mod tests;
