//! Lifecycle of one transfer run.

use std::fmt;

/// `Init → FilePreallocated → RangesInFlight → {Completed | Failed}`.
/// There is no way back; a failed run is retried from scratch by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Init,
    FilePreallocated,
    RangesInFlight,
    Completed,
    Failed,
}

impl TransferState {
    /// Whether `next` directly follows `self`.
    pub fn can_advance_to(self, next: TransferState) -> bool {
        use TransferState::*;
        matches!(
            (self, next),
            (Init, FilePreallocated)
                | (Init, Completed)
                | (Init, Failed)
                | (FilePreallocated, RangesInFlight)
                | (RangesInFlight, Completed)
                | (RangesInFlight, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TransferState::Completed | TransferState::Failed)
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransferState::Init => "init",
            TransferState::FilePreallocated => "file-preallocated",
            TransferState::RangesInFlight => "ranges-in-flight",
            TransferState::Completed => "completed",
            TransferState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Tracks the current state and logs each transition.
#[derive(Debug)]
pub(super) struct StateTracker {
    state: TransferState,
}

impl StateTracker {
    pub(super) fn new() -> Self {
        Self {
            state: TransferState::Init,
        }
    }

    pub(super) fn advance(&mut self, next: TransferState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "invalid transfer transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "transfer state");
        self.state = next;
    }

    pub(super) fn current(&self) -> TransferState {
        self.state
    }
}
