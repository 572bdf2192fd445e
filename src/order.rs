//! Order descriptor and the simulated processing step.
//!
//! An [`Order`] is one unit of work: an identifier and how long its
//! preparation takes. [`process_order`] stands in for the real work with a
//! timed suspension. Each concurrently processed order must own its own
//! `Order` value; handing tasks a reference into a loop-owned slot is the
//! classic capture bug where every task sees the final iteration's value.

use std::time::Duration;

use tokio::time::sleep;

use crate::olog_debug;

/// One order to prepare: an id unique within its batch and a prep time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// Identifier assigned by the caller, unique within a batch.
    pub id: u32,
    /// Simulated preparation time.
    pub prep_time: Duration,
}

impl Order {
    pub fn new(id: u32, prep_time: Duration) -> Self {
        Self { id, prep_time }
    }
}

/// Process one order: suspend for its prep time, then return.
///
/// Pure simulation; it cannot fail and touches no shared state. Completion
/// signaling belongs to the caller (the dispatcher wraps each call in a
/// wait-group permit).
pub async fn process_order(order: Order) {
    olog_debug!("order {} started, prep {:?}", order.id, order.prep_time);
    sleep(order.prep_time).await;
    olog_debug!("order {} ready", order.id);
}

/// The canned five-order batch used by the demos and tests.
///
/// Prep times are 2, 3, 1, 4 and 2 seconds multiplied by `scale`, so the full
/// batch takes ~12 scaled seconds sequentially but only ~4 concurrently.
pub fn sample_orders(scale: f64) -> Vec<Order> {
    [2.0, 3.0, 1.0, 4.0, 2.0]
        .iter()
        .enumerate()
        .map(|(i, secs)| Order::new(i as u32 + 1, Duration::from_secs_f64(secs * scale)))
        .collect()
}
