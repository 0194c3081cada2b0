//! Document collection state: the cached list, the per-id operation locks
//! and the async driver that runs workflows against the store's API.

mod ops;
mod state;
mod store;

pub use ops::DocumentService;
pub use state::{ItemState, Op, OperationLocks, OpGuard};
pub use store::{DocumentStore, FetchApplied};

/// Outcome of a driven operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpOutcome {
    /// Ran and succeeded
    Completed,
    /// Ran and failed; the error went to the notifier
    Failed,
    /// Refused without any network call (lock held, invalid, or busy)
    Skipped,
}
