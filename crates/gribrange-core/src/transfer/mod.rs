//! Concurrent execution of a transfer plan.
//!
//! Pre-sizes the destination to `max_end + 1` bytes, starts one fetch thread
//! per range, waits for all of them, and aggregates every failure. There is
//! no cancellation: a failing range does not stop its siblings, and ranges
//! already written stay on disk when the run as a whole fails.

mod error;
mod state;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::fetcher::{fetch_range, FetchError, FetchOptions};
use crate::selector::{ByteRange, TransferPlan};
use crate::storage::DestinationBuilder;

pub use error::{RangeFailure, TransferError};
pub use state::TransferState;

use state::StateTracker;

/// Outcome of one range, sent as soon as its task finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeDone {
    pub range: ByteRange,
    /// Bytes written, or `None` if the range failed.
    pub bytes: Option<u64>,
}

/// Summary of a completed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    pub destination: PathBuf,
    /// Number of ranges fetched.
    pub ranges: usize,
    /// Bytes received across all ranges.
    pub bytes_written: u64,
    /// Size of the destination file (0 when nothing was fetched).
    pub file_size: u64,
    pub state: TransferState,
}

/// Runs `plan` to completion. See [`execute_with_progress`].
pub fn execute(plan: &TransferPlan, opts: &FetchOptions) -> Result<TransferReport, TransferError> {
    execute_with_progress(plan, opts, None)
}

/// Runs `plan`, reporting each finished range on `progress_tx` (best effort,
/// dropped when the channel is full).
///
/// An empty plan completes immediately without creating the destination.
pub fn execute_with_progress(
    plan: &TransferPlan,
    opts: &FetchOptions,
    progress_tx: Option<&tokio::sync::mpsc::Sender<RangeDone>>,
) -> Result<TransferReport, TransferError> {
    let mut state = StateTracker::new();
    let destination = plan.destination().to_path_buf();

    let Some(max_end) = plan.max_end() else {
        tracing::info!("transfer plan is empty, nothing to fetch");
        state.advance(TransferState::Completed);
        return Ok(TransferReport {
            destination,
            ranges: 0,
            bytes_written: 0,
            file_size: 0,
            state: state.current(),
        });
    };
    let file_size = max_end.saturating_add(1);

    let prepared = DestinationBuilder::create(&destination).and_then(|mut builder| {
        builder.preallocate(file_size)?;
        Ok(builder.build())
    });
    let writer = match prepared {
        Ok(w) => Arc::new(w),
        Err(source) => {
            state.advance(TransferState::Failed);
            return Err(TransferError::Prepare {
                path: destination,
                source,
            });
        }
    };
    state.advance(TransferState::FilePreallocated);
    tracing::info!(
        path = %destination.display(),
        size = file_size,
        ranges = plan.ranges().len(),
        "destination preallocated"
    );

    let handles: Vec<(ByteRange, JoinHandle<Result<u64, FetchError>>)> = plan
        .ranges()
        .iter()
        .map(|&range| {
            let url = plan.source().to_string();
            let writer = Arc::clone(&writer);
            let opts = opts.clone();
            let tx = progress_tx.cloned();
            let handle = std::thread::spawn(move || {
                let res = fetch_range(&url, range, &writer, &opts);
                if let Some(tx) = tx {
                    let bytes = res.as_ref().ok().copied();
                    let _ = tx.try_send(RangeDone { range, bytes });
                }
                res
            });
            (range, handle)
        })
        .collect();
    state.advance(TransferState::RangesInFlight);

    let total = handles.len();
    let mut bytes_written = 0u64;
    let mut failures = Vec::new();
    for (range, handle) in handles {
        let res = handle
            .join()
            .unwrap_or_else(|e| Err(FetchError::Panicked(panic_message(&*e))));
        match res {
            Ok(n) => bytes_written += n,
            Err(error) => {
                tracing::warn!(range = %range, "range failed: {}", error);
                failures.push(RangeFailure { range, error });
            }
        }
    }

    if !failures.is_empty() {
        state.advance(TransferState::Failed);
        tracing::warn!(
            failed = failures.len(),
            total,
            path = %destination.display(),
            "transfer failed; partial file left in place"
        );
        return Err(TransferError::RangesFailed { total, failures });
    }

    state.advance(TransferState::Completed);
    tracing::info!(
        ranges = total,
        bytes = bytes_written,
        path = %destination.display(),
        "transfer completed"
    );
    Ok(TransferReport {
        destination,
        ranges: total,
        bytes_written,
        file_size,
        state: state.current(),
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
