//! Counting completion barrier for concurrently spawned tasks.
//!
//! A `WaitGroup` tracks how many spawned tasks are still outstanding and lets
//! a single coordinator suspend until all of them have signaled completion.
//! The contract has three parts:
//!
//! - **register before launch**: the coordinator increments the count (via
//!   [`WaitGroup::add`] or [`WaitGroup::register`]) strictly before spawning
//!   the corresponding task. Registering from inside the task would open a
//!   window where a fast-finishing sibling drains the count to zero and
//!   [`WaitGroup::wait`] returns with work still pending.
//! - **signal exactly once per registration**: each task decrements the count
//!   exactly once when it finishes, on every exit path. The [`WorkPermit`]
//!   guard does this on `Drop`, so a panicking task still signals.
//! - **single waiting coordinator**: `wait` is meant to be called by the one
//!   coordinator that performed the registrations.
//!
//! A group counts `0 -> N -> 0` over the life of one batch. Once drained it is
//! inert; repeat `wait` calls return immediately. Allocate a fresh group per
//! batch rather than reusing one while signals may still be in flight.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug)]
struct Inner {
    pending: AtomicUsize,
    notify: Notify,
}

impl Inner {
    /// Decrement `pending` by one, waking waiters when it reaches zero.
    ///
    /// The check and the decrement are a single atomic step (CAS loop), so a
    /// decrement past zero is caught before the counter can wrap. More
    /// signals than registrations is a double-completion bug in the caller,
    /// and this panics rather than continuing with a corrupt count.
    fn complete_one(&self) {
        let mut cur = self.pending.load(Ordering::Acquire);
        loop {
            assert!(
                cur > 0,
                "WaitGroup: completion signaled with no outstanding registration"
            );
            match self.pending.compare_exchange_weak(
                cur,
                cur - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(observed) => cur = observed,
            }
        }
        if cur == 1 {
            self.notify.notify_waiters();
        }
    }
}

/// Counting barrier blocking a coordinator until all registered tasks finish.
///
/// # Example
///
/// ```ignore
/// let wg = WaitGroup::new();
/// for order in orders {
///     let permit = wg.register(); // before spawn, never inside the task
///     tokio::spawn(async move {
///         let _permit = permit; // released on every exit path
///         process_order(order).await;
///     });
/// }
/// wg.wait().await;
/// ```
#[derive(Debug)]
pub struct WaitGroup {
    inner: Arc<Inner>,
}

impl WaitGroup {
    /// Create a fresh group with nothing outstanding.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                pending: AtomicUsize::new(0),
                notify: Notify::new(),
            }),
        }
    }

    /// Record `n` more expected completions.
    ///
    /// Must be called before the corresponding tasks are launched.
    pub fn add(&self, n: usize) {
        self.inner.pending.fetch_add(n, Ordering::AcqRel);
    }

    /// Signal one completion.
    ///
    /// Exactly one `done` per registration. Prefer [`WaitGroup::register`] and
    /// letting the permit drop; an explicit `done` only fires on the code path
    /// that reaches it.
    ///
    /// # Panics
    ///
    /// Panics if called with nothing outstanding (more signals than
    /// registrations).
    pub fn done(&self) {
        self.inner.complete_one();
    }

    /// Record one expected completion and return the permit that signals it.
    ///
    /// The permit signals on `Drop`, so moving it into the spawned task
    /// guarantees the signal fires on every exit path, including unwind.
    pub fn register(&self) -> WorkPermit {
        self.add(1);
        WorkPermit {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Suspend until every registered task has signaled completion.
    ///
    /// Returns immediately if nothing is outstanding, which covers both the
    /// empty batch and the race where all tasks finish before the coordinator
    /// gets here. Calling again after a drain also returns immediately.
    pub async fn wait(&self) {
        loop {
            // Register interest in a wake-up before re-checking the count, so
            // a final signal landing between the check and the await cannot
            // be missed.
            let notified = self.inner.notify.notified();
            if self.inner.pending.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Snapshot of the outstanding count.
    ///
    /// Diagnostic only: the value may be stale the instant it is read. Never
    /// use it for control decisions; that is what [`WaitGroup::wait`] is for.
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::Relaxed)
    }
}

impl Default for WaitGroup {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped completion signal for one registered task.
///
/// Obtained from [`WaitGroup::register`]; signals the group exactly once when
/// dropped.
#[derive(Debug)]
#[must_use = "dropping the permit signals completion immediately"]
pub struct WorkPermit {
    inner: Arc<Inner>,
}

impl Drop for WorkPermit {
    fn drop(&mut self) {
        self.inner.complete_one();
    }
}
