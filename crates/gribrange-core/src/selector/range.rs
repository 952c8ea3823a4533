//! Inclusive byte ranges and range coalescing.

use std::fmt;

/// An inclusive byte interval `[start, end]` within the remote archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteRange {
    /// First byte (inclusive).
    pub start: u64,
    /// Last byte (inclusive).
    pub end: u64,
}

impl ByteRange {
    /// Builds a range, clamping `end` so that `start <= end` holds.
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of bytes covered (never zero).
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn contains(&self, offset: u64) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Range spec in the form libcurl expects: `start-end` (inclusive).
    pub fn curl_range(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }

    /// HTTP Range header value: `bytes=start-end`.
    pub fn range_header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Coalesces ranges sorted by `start` into non-overlapping, non-adjacent ranges.
///
/// A range starting at or before `current.end + 1` extends the current one
/// (its end never shrinks); ranges nested inside it add nothing.
pub fn merge_ranges(ranges: &[ByteRange]) -> Vec<ByteRange> {
    let mut merged: Vec<ByteRange> = Vec::with_capacity(ranges.len());
    for &range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end.saturating_add(1) => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}
