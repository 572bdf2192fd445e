//! Wait-group correctness under concurrent signaling.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::{sleep, Instant};

use orderly::sync::WaitGroup;

/// Test: No premature return
/// Given N tasks with randomized delays
/// When the coordinator waits on the group
/// Then wait returns only after every task has signaled
#[tokio::test(start_paused = true)]
async fn test_wait_never_returns_before_all_signals() {
    let mut rng = rand::thread_rng();
    let delays: Vec<u64> = (0..8).map(|_| rng.gen_range(1..=500)).collect();
    let max_ms = *delays.iter().max().unwrap();

    let wg = WaitGroup::new();
    let finished = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    for &ms in &delays {
        let permit = wg.register();
        let finished = Arc::clone(&finished);
        tokio::spawn(async move {
            let _permit = permit;
            sleep(Duration::from_millis(ms)).await;
            finished.fetch_add(1, Ordering::SeqCst);
        });
    }

    wg.wait().await;

    assert_eq!(
        finished.load(Ordering::SeqCst),
        delays.len(),
        "wait returned with tasks still running"
    );
    assert!(
        start.elapsed() >= Duration::from_millis(max_ms),
        "wait returned after {:?}, before the slowest task's {}ms",
        start.elapsed(),
        max_ms
    );
    assert_eq!(wg.pending(), 0);
}

/// Test: Fast tasks finishing before the coordinator waits
/// Given all tasks complete while the coordinator is still busy
/// When the coordinator finally waits
/// Then wait returns immediately instead of hanging
#[tokio::test(start_paused = true)]
async fn test_wait_after_all_tasks_already_finished() {
    let wg = WaitGroup::new();
    for _ in 0..3 {
        let permit = wg.register();
        tokio::spawn(async move {
            let _permit = permit;
            sleep(Duration::from_millis(5)).await;
        });
    }

    // Coordinator dawdles long enough for every task to finish first.
    sleep(Duration::from_millis(100)).await;
    assert_eq!(wg.pending(), 0);

    let start = Instant::now();
    wg.wait().await;
    assert_eq!(start.elapsed(), Duration::ZERO);
}

/// Test: Idempotent drain
/// Given a group that has already been waited on
/// When wait is called again with no new registrations
/// Then it returns immediately
#[tokio::test(start_paused = true)]
async fn test_repeat_wait_on_drained_group() {
    let wg = WaitGroup::new();
    let permit = wg.register();
    tokio::spawn(async move {
        let _permit = permit;
        sleep(Duration::from_millis(10)).await;
    });

    wg.wait().await;

    let start = Instant::now();
    wg.wait().await;
    wg.wait().await;
    assert_eq!(start.elapsed(), Duration::ZERO);
}

/// Test: Negative-count guard
/// Given more signals than registrations
/// When the extra signal is issued
/// Then the group panics instead of wrapping to an invalid count
#[test]
#[should_panic(expected = "no outstanding registration")]
fn test_over_signal_is_detected() {
    let wg = WaitGroup::new();
    wg.add(2);
    wg.done();
    wg.done();
    wg.done();
}
