//! Per-range fetch error.

use std::io;

/// Why a single range could not be fetched and written.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure: DNS, connect, timeout, TLS, reset.
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The server did not answer with 206 Partial Content.
    #[error("unexpected HTTP status {0} (expected 206 Partial Content)")]
    Status(u32),
    /// The 206 response covers a different span than requested.
    #[error("Content-Range starts at byte {received}, requested {requested}")]
    ContentRangeMismatch { requested: u64, received: u64 },
    /// The body was longer than the requested span.
    #[error("response body exceeds the {expected} bytes requested")]
    Oversized { expected: u64 },
    /// The 206 body stopped short of the requested span before the end of
    /// the resource.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    /// Opening, seeking or writing the destination failed.
    #[error("storage: {0}")]
    Storage(#[source] io::Error),
    /// The fetch task panicked before reporting a result.
    #[error("fetch task panicked: {0}")]
    Panicked(String),
}
