//! Integration test suite for orderly.
//!
//! These tests exercise the completion barrier and the batch dispatcher
//! together, under arbitrary interleavings. They verify the synchronization
//! properties the crate exists to demonstrate.
//!
//! # Test Categories
//!
//! - `barrier`: wait-group correctness (no premature return, drained-group
//!   behavior, misuse detection)
//! - `batches`: dispatcher correctness (parameter association, overlap,
//!   empty batch)
//!
//! # Determinism
//!
//! Timing assertions run on tokio's paused clock (`start_paused = true`), so
//! "elapsed" is virtual time and the tests are exact and instant regardless
//! of machine load.

mod fixtures;

mod barrier;
mod batches;
