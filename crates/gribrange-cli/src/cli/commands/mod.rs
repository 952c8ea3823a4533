//! CLI command handlers, one per file.

mod fetch;
mod list;

pub use fetch::{run_fetch, FetchArgs};
pub use list::run_list;

const MIB: f64 = 1024.0 * 1024.0;

/// Byte count as MiB with two decimals.
pub(crate) fn mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / MIB)
}
