//! Per-document operation lock and item state machine.
//!
//! Each document id owns one tagged state; a mutating operation may only
//! begin from the state its transition table allows, so duplicate triggers
//! fail fast without network I/O. Acquisition hands back a guard that
//! restores `Idle` on drop — an operation that errors or panics can never
//! leave an id wedged.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Visible state of one document's action controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    Idle,
    AwaitingDeleteConfirmation,
    Deleting,
    Downloading,
    Analyzing,
}

impl ItemState {
    /// Non-idle states disable every action control for the item
    pub fn is_busy(&self) -> bool {
        !matches!(self, ItemState::Idle)
    }
}

/// A mutating operation on one document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Download,
    Delete,
    Analyze,
}

impl Op {
    /// Verb used in failure messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Download => "download",
            Op::Delete => "delete",
            Op::Analyze => "analyze",
        }
    }

    fn active_state(&self) -> ItemState {
        match self {
            Op::Download => ItemState::Downloading,
            Op::Delete => ItemState::Deleting,
            Op::Analyze => ItemState::Analyzing,
        }
    }

    /// State an id must be in for this operation to begin
    fn required_state(&self) -> ItemState {
        match self {
            Op::Delete => ItemState::AwaitingDeleteConfirmation,
            _ => ItemState::Idle,
        }
    }
}

/// Lock table mapping document ids to their single active state.
///
/// An absent entry means `Idle`. Cloning shares the underlying table.
#[derive(Clone, Default)]
pub struct OperationLocks {
    states: Arc<DashMap<i64, ItemState>>,
}

impl OperationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for an id
    pub fn state(&self, id: i64) -> ItemState {
        self.states
            .get(&id)
            .map(|entry| *entry.value())
            .unwrap_or(ItemState::Idle)
    }

    /// Whether any operation is active (or pending confirmation) for an id
    pub fn is_busy(&self, id: i64) -> bool {
        self.state(id).is_busy()
    }

    /// `Idle -> AwaitingDeleteConfirmation`; false if the id is busy
    pub fn request_delete(&self, id: i64) -> bool {
        self.transition(id, ItemState::Idle, ItemState::AwaitingDeleteConfirmation)
    }

    /// `AwaitingDeleteConfirmation -> Idle`; no network call is implied
    pub fn cancel_delete(&self, id: i64) -> bool {
        let cancelled = self.transition(
            id,
            ItemState::AwaitingDeleteConfirmation,
            ItemState::Idle,
        );
        if cancelled {
            // Housekeeping only: an absent entry already reads as Idle
            self.states.remove_if(&id, |_, state| *state == ItemState::Idle);
        }
        cancelled
    }

    /// Try to begin a mutating operation for an id.
    ///
    /// Returns `None` when the id is not in the state the operation
    /// requires — the caller must not issue the network call.
    pub fn begin(&self, id: i64, op: Op) -> Option<OpGuard> {
        if !self.transition(id, op.required_state(), op.active_state()) {
            debug!(id, op = op.as_str(), state = ?self.state(id), "operation refused, id busy");
            return None;
        }
        Some(OpGuard {
            states: Arc::clone(&self.states),
            id,
        })
    }

    /// Atomically swap `from -> to` for one id
    fn transition(&self, id: i64, from: ItemState, to: ItemState) -> bool {
        let mut entry = self.states.entry(id).or_insert(ItemState::Idle);
        if *entry.value() == from {
            *entry.value_mut() = to;
            true
        } else {
            false
        }
    }
}

/// Held while a mutating operation is in flight; restores `Idle` on drop
pub struct OpGuard {
    states: Arc<DashMap<i64, ItemState>>,
    id: i64,
}

impl Drop for OpGuard {
    fn drop(&mut self) {
        self.states.remove(&self.id);
    }
}
