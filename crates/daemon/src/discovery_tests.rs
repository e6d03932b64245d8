// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wa_adapters::{FakeProcess, FakeProcessLister};

fn lister_with(names: &[&str]) -> Arc<FakeProcessLister> {
    let processes =
        names.iter().enumerate().map(|(i, n)| FakeProcess::named(i as u32 + 1, n)).collect();
    Arc::new(FakeProcessLister::with_processes(processes))
}

#[tokio::test]
async fn snapshot_is_multicast_to_all_subscribers() {
    let (tx_a, mut rx_a) = mpsc::channel(DISCOVERY_CHANNEL_CAPACITY);
    let (tx_b, mut rx_b) = mpsc::channel(DISCOVERY_CHANNEL_CAPACITY);
    let ctx = CancellationToken::new();

    let fanout = ProcessFanout::new(
        lister_with(&["mysqld", "postgres"]),
        vec![tx_a, tx_b],
        Duration::from_secs(3600),
    );
    let handle = tokio::spawn(fanout.run(ctx.clone()));

    let msg_a = rx_a.recv().await.unwrap();
    let msg_b = rx_b.recv().await.unwrap();
    assert_eq!(msg_a.origin, DiscoveryOrigin::ProcessDiscovery);
    assert_eq!(msg_a.processes.len(), 2);
    assert_eq!(msg_b.processes.len(), 2);

    ctx.cancel();
    assert!(handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn listing_failure_terminates_the_fanout() {
    let (tx, _rx) = mpsc::channel(DISCOVERY_CHANNEL_CAPACITY);
    let fanout = ProcessFanout::new(
        Arc::new(FakeProcessLister::failing("permission denied")),
        vec![tx],
        Duration::from_secs(3600),
    );

    let result = fanout.run(CancellationToken::new()).await;
    assert!(matches!(result, Err(ServiceError::ProcessList(_))));
}

#[tokio::test]
async fn empty_process_table_terminates_the_fanout() {
    let (tx, _rx) = mpsc::channel(DISCOVERY_CHANNEL_CAPACITY);
    let fanout =
        ProcessFanout::new(lister_with(&[]), vec![tx], Duration::from_secs(3600));

    let result = fanout.run(CancellationToken::new()).await;
    assert!(matches!(result, Err(ServiceError::EmptyProcessTable)));
}

#[tokio::test(start_paused = true)]
async fn full_channel_drops_without_blocking() {
    let (tx, mut rx) = mpsc::channel(DISCOVERY_CHANNEL_CAPACITY);
    let ctx = CancellationToken::new();

    let fanout =
        ProcessFanout::new(lister_with(&["mysqld"]), vec![tx], Duration::from_secs(10));
    let handle = tokio::spawn(fanout.run(ctx.clone()));

    // Never drain rx: the first snapshot fills the capacity-1 channel and
    // every further tick must drop instead of blocking the loop.
    tokio::time::sleep(Duration::from_secs(35)).await;

    ctx.cancel();
    assert!(handle.await.unwrap().is_ok(), "a slow consumer must not wedge the fan-out");

    assert!(rx.recv().await.is_some());
}

#[tokio::test]
async fn closed_subscriber_is_ignored() {
    let (tx_open, mut rx_open) = mpsc::channel(DISCOVERY_CHANNEL_CAPACITY);
    let (tx_closed, rx_closed) = mpsc::channel(DISCOVERY_CHANNEL_CAPACITY);
    drop(rx_closed);
    let ctx = CancellationToken::new();

    let fanout = ProcessFanout::new(
        lister_with(&["mysqld"]),
        vec![tx_closed, tx_open],
        Duration::from_secs(3600),
    );
    let handle = tokio::spawn(fanout.run(ctx.clone()));

    assert!(rx_open.recv().await.is_some());
    ctx.cancel();
    assert!(handle.await.unwrap().is_ok());
}
