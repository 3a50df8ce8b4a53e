//! Batch coordination: the same pipeline fanned out over many images.
//!
//! [`BatchCoordinator`] owns an ordered list of [`BatchItem`]s. A run takes a
//! snapshot of the items, processes each one independently on a worker pool
//! (see the `parallel` feature), then writes results back by original
//! position. Per-item failures become [`ItemOutcome::Failed`] entries; they
//! never abort the run.

mod cancel;
mod coordinator;
mod report;
mod worker;

pub use cancel::CancellationToken;
pub use coordinator::{BatchCoordinator, BatchError, BatchItem};
pub use report::{BatchReport, ItemOutcome, ItemReport};
