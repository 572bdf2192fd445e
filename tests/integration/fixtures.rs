//! Shared helpers for the integration tests.

use std::time::Duration;

use tokio::sync::mpsc;

use orderly::batch::BatchEvent;
use orderly::order::Order;

/// Build a batch with ids 1..=N and the given prep times in milliseconds.
pub fn timed_orders(delays_ms: &[u64]) -> Vec<Order> {
    delays_ms
        .iter()
        .enumerate()
        .map(|(i, &ms)| Order::new(i as u32 + 1, Duration::from_millis(ms)))
        .collect()
}

/// Drain a closed event channel and return the (id, prep_time) pair each
/// completed task reported for itself.
pub async fn drain_ready(rx: &mut mpsc::Receiver<BatchEvent>) -> Vec<(u32, Duration)> {
    let mut seen = Vec::new();
    while let Some(event) = rx.recv().await {
        if let BatchEvent::OrderReady { id, prep_time } = event {
            seen.push((id, prep_time));
        }
    }
    seen
}
