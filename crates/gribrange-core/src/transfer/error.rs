//! Transfer-level errors and per-range failure records.

use std::fmt;
use std::path::PathBuf;

use crate::fetcher::FetchError;
use crate::selector::ByteRange;

/// One range that could not be fetched or written.
#[derive(Debug)]
pub struct RangeFailure {
    pub range: ByteRange,
    pub error: FetchError,
}

impl fmt::Display for RangeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "range {}: {}", self.range, self.error)
    }
}

/// Why a transfer did not complete. The destination file is left in place
/// in both cases; ranges that succeeded have already been written.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The destination could not be created or pre-sized.
    #[error("failed to prepare destination {}: {source:#}", .path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    /// At least one range failed; every range was still attempted.
    #[error(
        "encountered {} error(s) across {total} range(s): {}",
        .failures.len(),
        join_failures(.failures)
    )]
    RangesFailed {
        total: usize,
        failures: Vec<RangeFailure>,
    },
}

impl TransferError {
    /// Failed ranges, empty when the failure happened before any fetch.
    pub fn failures(&self) -> &[RangeFailure] {
        match self {
            TransferError::RangesFailed { failures, .. } => failures,
            TransferError::Prepare { .. } => &[],
        }
    }
}

fn join_failures(failures: &[RangeFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
