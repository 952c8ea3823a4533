//! Selecting index records and building the transfer plan.

use std::path::{Path, PathBuf};

use crate::index::IndexEntry;

use super::range::{merge_ranges, ByteRange};
use super::request::SelectionRequest;

/// Bytes fetched past the start of the last record in the index, whose true
/// length is unknown. A known approximation: the server clamps the range to
/// the end of the archive, and records larger than this are truncated.
pub const LAST_RECORD_BUFFER: u64 = 1024 * 1024;

/// Provisional (unmerged) ranges of every selected entry, in entry order.
///
/// A selected record spans from its offset to the byte before the next
/// record; the last record of the index gets [`LAST_RECORD_BUFFER`] bytes.
pub fn select_ranges(entries: &[IndexEntry], request: &SelectionRequest) -> Vec<ByteRange> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, e)| request.includes(&e.parameter, &e.level))
        .map(|(i, e)| {
            let start = e.byte_offset;
            let end = match entries.get(i + 1) {
                Some(next) => next.byte_offset.saturating_sub(1),
                None => start.saturating_add(LAST_RECORD_BUFFER),
            };
            ByteRange::new(start, end)
        })
        .collect()
}

/// What to fetch, from where, and into which file. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    source: String,
    destination: PathBuf,
    ranges: Vec<ByteRange>,
    total_size: u64,
}

impl TransferPlan {
    /// Selects the requested records of `entries` and merges their ranges.
    pub fn build(
        source: &str,
        destination: &Path,
        entries: &[IndexEntry],
        request: &SelectionRequest,
    ) -> Self {
        let provisional = select_ranges(entries, request);
        let ranges = merge_ranges(&provisional);
        tracing::debug!(
            selected = provisional.len(),
            merged = ranges.len(),
            "planned byte ranges"
        );
        Self::from_ranges(source, destination, ranges)
    }

    /// Plan over ranges that are already sorted and merged.
    pub fn from_ranges(source: &str, destination: &Path, ranges: Vec<ByteRange>) -> Self {
        let total_size = ranges.iter().map(ByteRange::len).sum();
        Self {
            source: source.to_string(),
            destination: destination.to_path_buf(),
            ranges,
            total_size,
        }
    }

    /// URL of the archive the ranges refer to.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn ranges(&self) -> &[ByteRange] {
        &self.ranges
    }

    /// Sum of all range lengths in bytes.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Largest range end, or `None` for an empty plan.
    pub fn max_end(&self) -> Option<u64> {
        self.ranges.iter().map(|r| r.end).max()
    }

    /// True when nothing matched the request.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
