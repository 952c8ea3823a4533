//! Destination file lifecycle.
//!
//! Creates (truncating) and pre-sizes the output file, then hands out a
//! [`RangeWriter`] that serializes positioned writes from concurrent fetch
//! tasks behind one lock.

mod builder;
mod writer;

pub use builder::DestinationBuilder;
pub use writer::RangeWriter;
