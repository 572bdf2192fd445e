//! Batch dispatcher for concurrent order processing.
//!
//! The [`Dispatcher`] is the entry point the demo layer calls: it takes a
//! batch of orders, spawns one task per order, and returns only once every
//! task has signaled completion through a fresh [`WaitGroup`]. It emits
//! [`BatchEvent`]s over an optional channel so the presentation layer (and
//! tests) can observe execution without polling.
//!
//! The dispatch loop upholds the two rules that make the barrier sound:
//! each order is registered with the group *before* its task is spawned, and
//! each task owns its order by value and holds its [`WorkPermit`] for the
//! whole body, so the completion signal fires on every exit path.
//!
//! [`WorkPermit`]: crate::sync::WorkPermit

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::order::{process_order, Order};
use crate::sync::WaitGroup;
use crate::{olog, olog_warn};

/// Events emitted by the dispatcher for order lifecycle changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// An order's task has started running.
    OrderStarted {
        /// The order being processed.
        id: u32,
    },
    /// An order finished processing.
    OrderReady {
        /// The order that finished.
        id: u32,
        /// The prep time the task observed in its own descriptor.
        prep_time: Duration,
    },
    /// Every order in the batch has completed.
    BatchComplete {
        /// Number of orders processed.
        completed: usize,
        /// Wall time for the whole batch.
        elapsed: Duration,
    },
}

/// Outcome of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of orders processed.
    pub completed: usize,
    /// Wall time from dispatch to last completion.
    pub elapsed: Duration,
}

/// Dispatches order batches and coordinates their completion.
///
/// # Example
///
/// ```ignore
/// use orderly::batch::Dispatcher;
/// use orderly::order::sample_orders;
///
/// let dispatcher = Dispatcher::new();
/// let report = dispatcher.process_batch(sample_orders(1.0)).await;
/// assert_eq!(report.completed, 5);
/// ```
#[derive(Debug, Default)]
pub struct Dispatcher {
    /// Optional sink for lifecycle events.
    event_tx: Option<mpsc::Sender<BatchEvent>>,
}

impl Dispatcher {
    /// Create a dispatcher that emits no events.
    pub fn new() -> Self {
        Self { event_tx: None }
    }

    /// Create a dispatcher that emits [`BatchEvent`]s on the given channel.
    ///
    /// Events are sent with `try_send` so a slow or absent consumer can never
    /// stall a task's completion signal; size the channel for the batch
    /// (two events per order plus one) or drain it concurrently.
    pub fn with_events(event_tx: mpsc::Sender<BatchEvent>) -> Self {
        Self {
            event_tx: Some(event_tx),
        }
    }

    /// Process every order in the batch concurrently; return once all are done.
    ///
    /// Each order gets its own task and its own moved copy of the descriptor.
    /// An empty batch returns immediately. The group is allocated fresh per
    /// call, so batches never share barrier state.
    pub async fn process_batch(&self, orders: Vec<Order>) -> BatchReport {
        let completed = orders.len();
        let started = Instant::now();
        let wg = WaitGroup::new();

        olog!("dispatching batch of {} orders", completed);
        for order in orders {
            // Register before spawn: a fast-finishing task must never be able
            // to drain the count before its own registration lands.
            let permit = wg.register();
            let event_tx = self.event_tx.clone();
            tokio::spawn(async move {
                let _permit = permit;
                emit(&event_tx, BatchEvent::OrderStarted { id: order.id });
                process_order(order).await;
                emit(
                    &event_tx,
                    BatchEvent::OrderReady {
                        id: order.id,
                        prep_time: order.prep_time,
                    },
                );
            });
        }

        wg.wait().await;
        let elapsed = started.elapsed();
        olog!("batch complete: {} orders in {:?}", completed, elapsed);
        emit(
            &self.event_tx,
            BatchEvent::BatchComplete { completed, elapsed },
        );
        BatchReport { completed, elapsed }
    }

    /// Process the batch one order at a time, as a timing baseline.
    ///
    /// Emits the same events as [`Dispatcher::process_batch`]; total elapsed
    /// time is the sum of prep times instead of their max.
    pub async fn process_sequential(&self, orders: Vec<Order>) -> BatchReport {
        let completed = orders.len();
        let started = Instant::now();

        for order in orders {
            emit(&self.event_tx, BatchEvent::OrderStarted { id: order.id });
            process_order(order).await;
            emit(
                &self.event_tx,
                BatchEvent::OrderReady {
                    id: order.id,
                    prep_time: order.prep_time,
                },
            );
        }

        let elapsed = started.elapsed();
        olog!("sequential run: {} orders in {:?}", completed, elapsed);
        emit(
            &self.event_tx,
            BatchEvent::BatchComplete { completed, elapsed },
        );
        BatchReport { completed, elapsed }
    }
}

/// Emit an event without ever blocking the sender.
fn emit(event_tx: &Option<mpsc::Sender<BatchEvent>>, event: BatchEvent) {
    if let Some(tx) = event_tx {
        if tx.try_send(event).is_err() {
            olog_warn!("batch event dropped: channel full or closed");
        }
    }
}
