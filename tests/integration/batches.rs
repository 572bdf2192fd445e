//! Dispatcher correctness for concurrent batches.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use orderly::batch::Dispatcher;

use crate::fixtures::{drain_ready, timed_orders};

/// Test: Correct parameter association
/// Given a batch with distinct ids and distinct prep times
/// When every task reports the descriptor it observed
/// Then the reported multiset equals the input exactly
#[tokio::test(start_paused = true)]
async fn test_each_task_observes_its_own_order() {
    let orders = timed_orders(&[10, 20, 30, 40, 50]);
    let mut expected: Vec<(u32, Duration)> =
        orders.iter().map(|o| (o.id, o.prep_time)).collect();

    let (tx, mut rx) = mpsc::channel(32);
    let dispatcher = Dispatcher::with_events(tx);
    dispatcher.process_batch(orders).await;
    drop(dispatcher); // close the channel so the drain terminates

    let mut seen = drain_ready(&mut rx).await;
    seen.sort_unstable();
    expected.sort_unstable();
    assert_eq!(
        seen, expected,
        "a task observed another task's descriptor or a stale value"
    );
}

/// Test: Concurrency actually overlaps
/// Given prep times of 2, 3, 1, 4 and 2 units
/// When the batch runs concurrently
/// Then total time is ~max (4 units), not sum (12 units)
#[tokio::test(start_paused = true)]
async fn test_batch_overlaps_instead_of_serializing() {
    let orders = timed_orders(&[200, 300, 100, 400, 200]);

    let start = Instant::now();
    let report = Dispatcher::new().process_batch(orders).await;
    let elapsed = start.elapsed();

    assert_eq!(report.completed, 5);
    assert!(
        elapsed >= Duration::from_millis(400),
        "finished in {:?}, before the slowest order",
        elapsed
    );
    assert!(
        elapsed < Duration::from_millis(600),
        "took {:?}, closer to the 1200ms sequential sum than to the 400ms max",
        elapsed
    );
}

/// Test: Zero-task batch
/// Given an empty batch
/// When it is processed
/// Then the call returns immediately without blocking
#[tokio::test(start_paused = true)]
async fn test_empty_batch_is_immediate() {
    let start = Instant::now();
    let report = Dispatcher::new().process_batch(Vec::new()).await;
    assert_eq!(report.completed, 0);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

/// Test: Sequential baseline accumulates prep times
/// Given the same batch run without concurrency
/// When it is processed one order at a time
/// Then total time is the sum of prep times
#[tokio::test(start_paused = true)]
async fn test_sequential_baseline_takes_the_sum() {
    let orders = timed_orders(&[200, 300, 100, 400, 200]);

    let start = Instant::now();
    let report = Dispatcher::new().process_sequential(orders).await;

    assert_eq!(report.completed, 5);
    assert!(
        start.elapsed() >= Duration::from_millis(1200),
        "sequential run took {:?}, less than the sum of prep times",
        start.elapsed()
    );
}
