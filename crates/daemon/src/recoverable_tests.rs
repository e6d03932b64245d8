// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use parking_lot::Mutex;
use wa_adapters::FakeUsageSink;

fn routine<F, Fut>(min_duration: Duration, usage: Arc<FakeUsageSink>, body: F) -> RecoverableRoutine<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<(), ServiceError>> + Send + 'static,
{
    RecoverableRoutine {
        name: "test-routine".to_string(),
        error_code: ErrorCode::MysqlService,
        expected_min_duration: min_duration,
        usage,
        body,
    }
}

#[tokio::test]
async fn clean_exit_is_not_restarted() {
    let usage = FakeUsageSink::new();
    let attempts = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&attempts);

    let handle = routine(Duration::ZERO, Arc::clone(&usage), move |_ctx| {
        *counter.lock() += 1;
        async { Ok(()) }
    })
    .spawn(CancellationToken::new());

    handle.await.unwrap();
    assert_eq!(*attempts.lock(), 1);
    assert_eq!(usage.error_count(ErrorCode::MysqlService), 0);
}

#[tokio::test]
async fn slow_failure_is_restarted() {
    let usage = FakeUsageSink::new();
    let attempts = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&attempts);

    // min duration zero: every attempt qualifies for restart; stop after
    // the second attempt by succeeding.
    let handle = routine(Duration::ZERO, Arc::clone(&usage), move |_ctx| {
        let mut attempts = counter.lock();
        *attempts += 1;
        let fail = *attempts == 1;
        async move {
            if fail {
                Err(ServiceError::EmptyProcessTable)
            } else {
                Ok(())
            }
        }
    })
    .spawn(CancellationToken::new());

    handle.await.unwrap();
    assert_eq!(*attempts.lock(), 2);
    assert_eq!(usage.error_count(ErrorCode::MysqlService), 1);
}

#[tokio::test]
async fn fast_failure_gives_up() {
    let usage = FakeUsageSink::new();
    let attempts = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&attempts);

    let handle = routine(Duration::from_secs(3600), Arc::clone(&usage), move |_ctx| {
        *counter.lock() += 1;
        async { Err(ServiceError::EmptyProcessTable) }
    })
    .spawn(CancellationToken::new());

    handle.await.unwrap();
    assert_eq!(*attempts.lock(), 1, "fast crash must not be restarted");
    assert_eq!(usage.error_count(ErrorCode::MysqlService), 1);
}

#[tokio::test]
async fn panic_is_captured_and_reported() {
    let usage = FakeUsageSink::new();

    let handle = routine(Duration::from_secs(3600), Arc::clone(&usage), |_ctx| async {
        panic!("boom");
    })
    .spawn(CancellationToken::new());

    handle.await.unwrap();
    assert_eq!(usage.error_count(ErrorCode::MysqlService), 1);
}

#[tokio::test]
async fn cancelled_routine_does_not_restart() {
    let usage = FakeUsageSink::new();
    let ctx = CancellationToken::new();
    let attempts = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&attempts);

    let handle = routine(Duration::ZERO, Arc::clone(&usage), move |ctx: CancellationToken| {
        *counter.lock() += 1;
        async move {
            ctx.cancelled().await;
            Err(ServiceError::EmptyProcessTable)
        }
    })
    .spawn(ctx.clone());

    tokio::time::sleep(Duration::from_millis(50)).await;
    ctx.cancel();
    handle.await.unwrap();
    assert_eq!(*attempts.lock(), 1);
}
