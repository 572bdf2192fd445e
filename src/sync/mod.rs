//! Synchronization primitives.

pub mod wait_group;

pub use wait_group::{WaitGroup, WorkPermit};
