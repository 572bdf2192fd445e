pub mod batch;
pub mod config;
pub mod error;
pub mod log;
pub mod order;
pub mod sync;

pub use batch::{BatchEvent, BatchReport, Dispatcher};
pub use error::{Error, Result};
pub use order::{process_order, sample_orders, Order};
pub use sync::{WaitGroup, WorkPermit};
