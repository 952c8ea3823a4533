//! Record selection and byte-range planning.
//!
//! Matches index entries against a selection request, derives each selected
//! record's byte span from the next record's offset, and coalesces the spans
//! into the minimal set of non-adjacent HTTP ranges.

mod plan;
mod range;
mod request;

pub use plan::{select_ranges, TransferPlan, LAST_RECORD_BUFFER};
pub use range::{merge_ranges, ByteRange};
pub use request::SelectionRequest;
